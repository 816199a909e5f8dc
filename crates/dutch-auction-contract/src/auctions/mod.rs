/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

//! The `auctions` module implements a Dutch (descending price) auction
//! settlement engine using trait-based polymorphism for the pricing
//! behavior.
//!
//! Implemented features:
//!
//! - Time-based linear price decay between an initial and a final price
//!   (see: behavior_descending_price.rs) with floored integer arithmetic
//!   (see: pricing.rs).
//! - Demand-based price freezing once cumulative bids would exhaust the
//!   supply on sale.
//! - Bid clamping against the remaining supply, with the excess refunded
//!   in the same invocation.
//! - Minimal-goal gated settlement: fund withdrawal for the owner on
//!   success, per-bidder refunds on failure.
//! - Owner controlled finalization, withdrawal and burn of the unsold
//!   remainder, and one-directional extension of the closing time.

pub mod behavior;
pub mod behavior_descending_price;
pub mod pricing;
