/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

use soroban_sdk::{symbol_short, token, Address, Env, Symbol};

use super::pricing;
use crate::types::{AuctionData, DataKey};

use soroban_kit::storage;

// Event topics.
const AUCTION: Symbol = symbol_short!("AUCTION");
const BID: Symbol = symbol_short!("BID");
const TOKEN: Symbol = symbol_short!("TOKEN");
const REFUND: Symbol = symbol_short!("REFUND");

pub mod ledger_times {
    // Assuming 6 seconds average time per ledger.
    pub const SECONDS_PER_LEDGER: u64 = 6;
    pub const LEDGERS_PER_DAY: u64 = 86400 / SECONDS_PER_LEDGER;
    pub const LEDGERS_PER_YEAR: u64 = LEDGERS_PER_DAY * 365;
}

fn convert_seconds_to_ledgers(watermark: u64) -> u64 {
    watermark
        .checked_add(ledger_times::SECONDS_PER_LEDGER - 1)
        .and_then(|sum| sum.checked_div(ledger_times::SECONDS_PER_LEDGER))
        .expect("Invalid duration.")
        .min(ledger_times::LEDGERS_PER_YEAR)
}

pub trait BaseAuction {
    fn start(&self, env: &Env, auction_id: u64, auction_data: &AuctionData) {
        if storage::has::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)) {
            panic!("Auction already exists.");
        }

        let settings = &auction_data.settings;
        if settings.token_max_amount <= 0 {
            panic!("Token max amount is 0.");
        }
        if settings.initial_price <= 0 || settings.final_price <= 0 {
            panic!("Price is 0.");
        }
        if settings.initial_price <= settings.final_price {
            panic!("Initial price is not greater than final price.");
        }
        if settings.opening_time < env.ledger().timestamp() {
            panic!("Opening time is before current time.");
        }
        if settings.opening_time >= settings.closing_time {
            panic!("Opening time is not before closing time.");
        }
        if settings.initial_price - settings.final_price
            < (settings.closing_time - settings.opening_time) as i128
        {
            panic!("Price discount rate is 0.");
        }
        if settings.minimal_goal < 0
            || settings.minimal_goal
                > settings
                    .token_max_amount
                    .checked_mul(settings.final_price)
                    .expect("Amount overflow.")
        {
            panic!("Minimal goal is not achievable.");
        }

        // Escrow the sale supply with the contract.
        let token = token::Client::new(env, &settings.token);
        token.transfer(
            &settings.owner,
            &env.current_contract_address(),
            &settings.token_max_amount,
        );
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            auction_data,
        );

        // Bump the storage according to the auction window, adding a
        // couple hours to leave room for settlement calls.
        let expiration_buffer: u64 = 7200;
        let lifetime = convert_seconds_to_ledgers(
            settings.closing_time.saturating_sub(env.ledger().timestamp()) + expiration_buffer,
        );
        storage::extend_ttl::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            lifetime as u32,
            lifetime as u32,
        );

        env.events()
            .publish((AUCTION, symbol_short!("created")), auction_id);
    }

    fn place_bids(&self, env: &Env, auction_id: u64, buyer: &Address, value: i128) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if !auction_data.is_open(env) {
            panic!("Auction not open.");
        }
        if value <= 0 {
            panic!("Amount is 0.");
        }
        if *buyer == auction_data.settings.owner {
            panic!("Owner cannot place bids.");
        }

        let price = self.calculate_price(env, auction_id);
        let supply = auction_data.settings.token_max_amount;
        let remaining = supply - pricing::floor_div(auction_data.wei_raised, price);
        if remaining <= 0 {
            panic!("Demand exceeded supply.");
        }

        // Clamp the bid to the remaining supply at the current price,
        // the excess is paid back within this same invocation.
        let accepted = if value / price > remaining {
            remaining.checked_mul(price).expect("Amount overflow.")
        } else {
            value
        };

        let contribution = auction_data.contributions.get(buyer.clone()).unwrap_or(0);
        auction_data.contributions.set(
            buyer.clone(),
            contribution.checked_add(accepted).expect("Amount overflow."),
        );
        auction_data.wei_raised = auction_data
            .wei_raised
            .checked_add(accepted)
            .expect("Amount overflow.");

        // Demand exhausted the supply, the price stops tracking the
        // time curve. Rounded up so tokens owed never exceed supply.
        if auction_data.frozen_price == 0
            && supply - pricing::floor_div(auction_data.wei_raised, price) <= 0
        {
            auction_data.frozen_price = pricing::clearing_price(auction_data.wei_raised, supply);
        }

        // All bookkeeping is written before any token movement.
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        let market = token::Client::new(env, &auction_data.settings.market);
        market.transfer(buyer, &env.current_contract_address(), &value);
        if accepted < value {
            market.transfer(&env.current_contract_address(), buyer, &(value - accepted));
        }

        env.events()
            .publish((BID, symbol_short!("placed")), (buyer.clone(), accepted));
    }

    fn extend(&self, env: &Env, auction_id: u64, new_closing_time: u64) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if auction_data.has_closed(env) {
            panic!("Auction already closed.");
        }
        if new_closing_time <= auction_data.settings.closing_time {
            panic!("Invalid closing time.");
        }

        let prev_closing_time = auction_data.settings.closing_time;
        auction_data.settings.closing_time = new_closing_time;
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        let expiration_buffer: u64 = 7200;
        let lifetime = convert_seconds_to_ledgers(
            new_closing_time.saturating_sub(env.ledger().timestamp()) + expiration_buffer,
        );
        storage::extend_ttl::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            lifetime as u32,
            lifetime as u32,
        );

        env.events().publish(
            (AUCTION, symbol_short!("extended")),
            (prev_closing_time, new_closing_time),
        );
    }

    fn finalize(&self, env: &Env, auction_id: u64) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if auction_data.settlement.finalized {
            panic!("Auction already finalized.");
        }
        if !auction_data.has_closed(env) {
            panic!("Auction has not closed.");
        }

        let final_price = self.calculate_price(env, auction_id);
        auction_data.settlement.final_price = final_price;
        auction_data.settlement.minimal_goal_met =
            auction_data.wei_raised >= auction_data.settings.minimal_goal;
        auction_data.settlement.finalized = true;
        if auction_data.settlement.minimal_goal_met {
            let mut distributed: i128 = 0;
            for (_, value) in auction_data.contributions.iter() {
                distributed += value / final_price;
            }
            auction_data.settlement.token_distributed = distributed;
        }

        // The settlement record is written before any token movement.
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        if auction_data.settlement.minimal_goal_met {
            // Emit the sold tokens to each bidder, the unsold remainder
            // stays escrowed for withdraw_token/burn_token.
            let token = token::Client::new(env, &auction_data.settings.token);
            for (beneficiary, value) in auction_data.contributions.iter() {
                let amount = value / final_price;
                if amount > 0 {
                    token.transfer(&env.current_contract_address(), &beneficiary, &amount);
                    env.events().publish(
                        (TOKEN, symbol_short!("emitted")),
                        (beneficiary, value, amount),
                    );
                }
            }
        }

        env.events()
            .publish((AUCTION, symbol_short!("finalized")), auction_id);
    }

    fn withdraw_funds(&self, env: &Env, auction_id: u64) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if !auction_data.settlement.finalized {
            panic!("Auction not finalized.");
        }
        if !auction_data.settlement.minimal_goal_met {
            panic!("Minimal goal not met.");
        }
        if auction_data.settlement.funds_withdrawn {
            panic!("Funds already withdrawn.");
        }

        auction_data.settlement.funds_withdrawn = true;
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        let market = token::Client::new(env, &auction_data.settings.market);
        market.transfer(
            &env.current_contract_address(),
            &auction_data.settings.owner,
            &auction_data.wei_raised,
        );
    }

    fn withdraw_token(&self, env: &Env, auction_id: u64) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if !auction_data.settlement.finalized {
            panic!("Auction not finalized.");
        }
        let remaining = self.remaining_escrow(&auction_data);
        if remaining <= 0 {
            panic!("Remaining tokens is 0.");
        }

        auction_data.settlement.tokens_withdrawn = true;
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        let token = token::Client::new(env, &auction_data.settings.token);
        token.transfer(
            &env.current_contract_address(),
            &auction_data.settings.owner,
            &remaining,
        );
    }

    fn burn_token(&self, env: &Env, auction_id: u64) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if !auction_data.settlement.finalized {
            panic!("Auction not finalized.");
        }
        let remaining = self.remaining_escrow(&auction_data);
        if remaining <= 0 {
            panic!("Remaining tokens is 0.");
        }

        auction_data.settlement.tokens_burned = true;
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        let token = token::Client::new(env, &auction_data.settings.token);
        token.burn(&env.current_contract_address(), &remaining);

        env.events()
            .publish((TOKEN, symbol_short!("burned")), remaining);
    }

    fn claim_refund(&self, env: &Env, auction_id: u64, bidder: &Address) {
        let mut auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if !auction_data.settlement.finalized || auction_data.settlement.minimal_goal_met {
            panic!("Refund not allowed.");
        }
        let contribution = auction_data.contributions.get(bidder.clone()).unwrap_or(0);
        if contribution <= 0 {
            panic!("No refunds available.");
        }

        // Zeroed before the transfer so a reentering callee finds
        // nothing left to claim.
        auction_data.contributions.set(bidder.clone(), 0);
        storage::set::<DataKey, AuctionData>(
            env,
            &DataKey::AuctionData(auction_id),
            &auction_data,
        );

        let market = token::Client::new(env, &auction_data.settings.market);
        market.transfer(&env.current_contract_address(), bidder, &contribution);

        env.events().publish(
            (REFUND, symbol_short!("claimable")),
            (bidder.clone(), contribution),
        );
    }

    fn remaining_supply(&self, env: &Env, auction_id: u64) -> i128 {
        let auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        // After a failed sale no tokens are distributed, report the
        // untouched supply.
        if auction_data.settlement.finalized && !auction_data.settlement.minimal_goal_met {
            return auction_data.settings.token_max_amount;
        }
        let price = self.calculate_price(env, auction_id);
        auction_data.settings.token_max_amount
            - pricing::floor_div(auction_data.wei_raised, price)
    }

    // Unsold sale tokens still escrowed for this auction. Tracked from
    // the settlement ledger rather than the raw contract balance since
    // the contract hosts many auctions.
    fn remaining_escrow(&self, auction_data: &AuctionData) -> i128 {
        if auction_data.settlement.tokens_withdrawn || auction_data.settlement.tokens_burned {
            return 0;
        }
        auction_data.settings.token_max_amount - auction_data.settlement.token_distributed
    }

    fn calculate_price(&self, env: &Env, auction_id: u64) -> i128;
}
