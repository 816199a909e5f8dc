/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

use super::pricing;
use crate::types::{AuctionData, DataKey};
use soroban_kit::storage;
use soroban_sdk::Env;

pub struct DescendingPriceAuction;

// DescendingPriceAuction (aka Dutch Auction).
impl super::behavior::BaseAuction for DescendingPriceAuction {
    // Effective price of the sale. Once finalized the locked price is
    // permanent; once demand exhausted the supply the freeze price is.
    // Otherwise the time curve applies, clamped from below by the
    // demand-implied clearing price: the moment cumulative bids at the
    // curve price would owe more tokens than the supply, the clearing
    // price becomes the quote and the decay stops.
    fn calculate_price(&self, env: &Env, auction_id: u64) -> i128 {
        let auction_data =
            storage::get::<DataKey, AuctionData>(env, &DataKey::AuctionData(auction_id)).unwrap();

        if auction_data.settlement.finalized {
            return auction_data.settlement.final_price;
        }
        if auction_data.frozen_price > 0 {
            return auction_data.frozen_price;
        }

        let settings = &auction_data.settings;
        pricing::time_price(
            settings.initial_price,
            settings.final_price,
            settings.opening_time,
            settings.closing_time,
            env.ledger().timestamp(),
        )
        .max(pricing::clearing_price(
            auction_data.wei_raised,
            settings.token_max_amount,
        ))
    }
}
