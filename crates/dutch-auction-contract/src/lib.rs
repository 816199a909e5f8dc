/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

//! Dutch auction settlement contract: a fixed token supply is sold for a
//! payment token at a price decaying linearly over a time window, frozen
//! by demand once cumulative bids would exhaust the supply, with
//! minimal-goal gated withdrawal and refunds.

#![no_std]

mod auctions; // Auction behaviors and pricing.
mod guard; // Reentrancy lock.
mod types; // Contract types.

use soroban_kit::storage;
use soroban_sdk::{contract, contractimpl, contractmeta, vec, Address, Env, Map, Vec};

use crate::auctions::{behavior::BaseAuction, behavior_descending_price::DescendingPriceAuction};
use types::{AuctionData, AuctionSettings, DataKey};

contractmeta!(
    key = "desc",
    val = "Dutch auction settlement contract for fixed supply token sales"
);

pub trait DutchAuctionContractTrait {
    // Start a new auction selling `token_max_amount` of `settings.token`
    // for `settings.market`, escrowing the supply with the contract.
    // All parameters are validated, each violation panics with its
    // specific reason. Return the new `auction_id`.
    // Owner authorization required.
    fn create(env: Env, settings: AuctionSettings) -> u64;

    // Retrieves auction data for an existing auction.
    // No authorization required.
    fn get_auction(env: Env, auction_id: u64) -> Option<AuctionData>;

    // Effective price: the time curve, clamped from below by the
    // demand-implied clearing price; permanently locked once finalized.
    fn price(env: Env, auction_id: u64) -> i128;

    // Supply not yet owed to bidders at the effective price. Reports
    // the original supply again after an unsuccessful finalization.
    fn remaining_supply(env: Env, auction_id: u64) -> i128;

    // Cumulative accepted value credited to `bidder`.
    fn contribution(env: Env, auction_id: u64, bidder: Address) -> i128;

    // Time window predicates.
    fn is_open(env: Env, auction_id: u64) -> bool;
    fn after_open(env: Env, auction_id: u64) -> bool;
    fn has_closed(env: Env, auction_id: u64) -> bool;

    // Whether bidders may currently reclaim their contributions
    // (finalized with the minimal goal missed).
    fn allow_refund(env: Env, auction_id: u64) -> bool;

    // Place a bid of `value` payment tokens. The bid is clamped to the
    // remaining supply at the current price and the excess refunded in
    // the same invocation.
    // Buyer authorization required.
    fn place_bids(env: Env, auction_id: u64, buyer: Address, value: i128);

    // Extend an ongoing auction to `new_closing_time`. The closing time
    // only ever moves later, never earlier.
    // Owner authorization required.
    fn extend_time(env: Env, auction_id: u64, new_closing_time: u64);

    // Finalize the auction once the window has closed: locks the final
    // price, records whether the minimal goal was met and, on success,
    // emits the sold tokens to the bidders.
    // Owner authorization required.
    fn finalize(env: Env, auction_id: u64);

    // Transfer the raised funds to the owner. Requires a finalized,
    // successful sale; succeeds at most once.
    // Owner authorization required.
    fn withdraw_funds(env: Env, auction_id: u64);

    // Transfer the unsold token remainder to the owner. Mutually
    // exclusive in effect with `burn_token`.
    // Owner authorization required.
    fn withdraw_token(env: Env, auction_id: u64);

    // Burn the unsold token remainder. Mutually exclusive in effect
    // with `withdraw_token`.
    // Owner authorization required.
    fn burn_token(env: Env, auction_id: u64);

    // Reclaim a contribution after an unsuccessful sale.
    // Bidder authorization required.
    fn claim_refund(env: Env, auction_id: u64, bidder: Address);

    // Retrieve the contract version.
    fn version(env: Env) -> Vec<u32>;
}

#[contract]
struct DutchAuctionContract;

#[contractimpl]
impl DutchAuctionContractTrait for DutchAuctionContract {
    fn create(env: Env, settings: AuctionSettings) -> u64 {
        settings.owner.require_auth();

        let mut id = 0u64;
        env.prng().fill(&mut id);
        let auction_data = AuctionData::new(settings, Map::new(&env), id);
        DescendingPriceAuction.start(&env, id, &auction_data);
        id
    }

    fn get_auction(env: Env, auction_id: u64) -> Option<AuctionData> {
        storage::get_or_else::<DataKey, AuctionData, _, _>(
            &env,
            &DataKey::AuctionData(auction_id),
            |opt| opt,
        )
    }

    fn price(env: Env, auction_id: u64) -> i128 {
        DescendingPriceAuction.calculate_price(&env, auction_id)
    }

    fn remaining_supply(env: Env, auction_id: u64) -> i128 {
        DescendingPriceAuction.remaining_supply(&env, auction_id)
    }

    fn contribution(env: Env, auction_id: u64, bidder: Address) -> i128 {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .contributions
            .get(bidder)
            .unwrap_or(0)
    }

    fn is_open(env: Env, auction_id: u64) -> bool {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .is_open(&env)
    }

    fn after_open(env: Env, auction_id: u64) -> bool {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .after_open(&env)
    }

    fn has_closed(env: Env, auction_id: u64) -> bool {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .has_closed(&env)
    }

    fn allow_refund(env: Env, auction_id: u64) -> bool {
        let auction_data =
            storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id)).unwrap();
        auction_data.settlement.finalized && !auction_data.settlement.minimal_goal_met
    }

    fn place_bids(env: Env, auction_id: u64, buyer: Address, value: i128) {
        buyer.require_auth();

        guard::lock(&env, auction_id);
        DescendingPriceAuction.place_bids(&env, auction_id, &buyer, value);
        guard::release(&env, auction_id);
    }

    fn extend_time(env: Env, auction_id: u64, new_closing_time: u64) {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .settings
            .owner
            .require_auth();

        DescendingPriceAuction.extend(&env, auction_id, new_closing_time);
    }

    fn finalize(env: Env, auction_id: u64) {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .settings
            .owner
            .require_auth();

        guard::lock(&env, auction_id);
        DescendingPriceAuction.finalize(&env, auction_id);
        guard::release(&env, auction_id);
    }

    fn withdraw_funds(env: Env, auction_id: u64) {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .settings
            .owner
            .require_auth();

        guard::lock(&env, auction_id);
        DescendingPriceAuction.withdraw_funds(&env, auction_id);
        guard::release(&env, auction_id);
    }

    fn withdraw_token(env: Env, auction_id: u64) {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .settings
            .owner
            .require_auth();

        guard::lock(&env, auction_id);
        DescendingPriceAuction.withdraw_token(&env, auction_id);
        guard::release(&env, auction_id);
    }

    fn burn_token(env: Env, auction_id: u64) {
        storage::get::<DataKey, AuctionData>(&env, &DataKey::AuctionData(auction_id))
            .unwrap()
            .settings
            .owner
            .require_auth();

        guard::lock(&env, auction_id);
        DescendingPriceAuction.burn_token(&env, auction_id);
        guard::release(&env, auction_id);
    }

    fn claim_refund(env: Env, auction_id: u64, bidder: Address) {
        bidder.require_auth();

        guard::lock(&env, auction_id);
        DescendingPriceAuction.claim_refund(&env, auction_id, &bidder);
        guard::release(&env, auction_id);
    }

    fn version(env: Env) -> Vec<u32> {
        vec![&env, 0, 1, 0] // "0.1.0"
    }
}
