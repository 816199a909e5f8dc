/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

use soroban_kit::{key_constraint, soroban_tools, storage};
use soroban_sdk::{contracttype, Address, Env, Map};

#[derive(Clone)]
#[contracttype]
#[key_constraint(DataKeyConstraint)]
pub enum DataKey {
    AuctionData(u64),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionSettings {
    pub owner: Address,
    pub token: Address,
    pub market: Address,
    pub token_max_amount: i128,
    pub opening_time: u64,
    pub closing_time: u64,
    pub initial_price: i128,
    pub final_price: i128,
    pub minimal_goal: i128,
}

// Settlement flags, written once each. `final_price` is 0 until
// `finalize` locks it; `token_distributed` records the amount
// emitted to bidders at finalization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementData {
    pub finalized: bool,
    pub minimal_goal_met: bool,
    pub final_price: i128,
    pub token_distributed: i128,
    pub funds_withdrawn: bool,
    pub tokens_withdrawn: bool,
    pub tokens_burned: bool,
}

#[contracttype]
#[storage(Persistent, DataKeyConstraint)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionData {
    pub settings: AuctionSettings,
    pub contributions: Map<Address, i128>,
    pub wei_raised: i128,
    pub frozen_price: i128,
    pub settlement: SettlementData,
    pub id: u64,
}

impl AuctionData {
    pub fn new(settings: AuctionSettings, contributions: Map<Address, i128>, id: u64) -> Self {
        AuctionData {
            settings,
            contributions,
            wei_raised: 0,
            frozen_price: 0,
            settlement: SettlementData {
                finalized: false,
                minimal_goal_met: false,
                final_price: 0,
                token_distributed: 0,
                funds_withdrawn: false,
                tokens_withdrawn: false,
                tokens_burned: false,
            },
            id,
        }
    }

    pub fn after_open(&self, env: &Env) -> bool {
        env.ledger().timestamp() >= self.settings.opening_time
    }

    pub fn is_open(&self, env: &Env) -> bool {
        let now = env.ledger().timestamp();
        now >= self.settings.opening_time
            && now <= self.settings.closing_time
            && !self.settlement.finalized
    }

    pub fn has_closed(&self, env: &Env) -> bool {
        env.ledger().timestamp() > self.settings.closing_time || self.settlement.finalized
    }
}
