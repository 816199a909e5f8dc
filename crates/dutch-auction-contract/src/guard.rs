/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

//! Per-auction reentrancy lock.
//!
//! Every state-mutating entry point that moves funds or tokens takes the
//! lock on entry and releases it on exit. A transfer callback re-entering
//! the contract while the first invocation is still on the stack finds the
//! flag set and panics instead of observing partial state.

use soroban_kit::{key_constraint, soroban_tools, storage};
use soroban_sdk::{contracttype, Env};

#[derive(Clone)]
#[contracttype]
#[key_constraint(GuardKeyConstraint)]
pub enum GuardKey {
    Guard(u64),
}

#[contracttype]
#[storage(Instance, GuardKeyConstraint)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuardData {
    pub locked: bool,
}

pub fn lock(env: &Env, auction_id: u64) {
    if storage::has::<GuardKey, GuardData>(env, &GuardKey::Guard(auction_id)) {
        panic!("Reentrant call.");
    }
    storage::set::<GuardKey, GuardData>(
        env,
        &GuardKey::Guard(auction_id),
        &GuardData { locked: true },
    );
}

pub fn release(env: &Env, auction_id: u64) {
    storage::remove::<GuardKey, GuardData>(env, &GuardKey::Guard(auction_id));
}
