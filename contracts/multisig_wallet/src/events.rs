#![allow(deprecated)] // events().publish migration tracked separately

//! Structured event publishing for the multisig wallet.
//!
//! Every state change is reflected in the event stream, so replaying it
//! reconstructs the wallet's full history.

use soroban_sdk::{symbol_short, Address, Env};

use crate::execution::DispatchFailure;

pub fn publish_submission(env: &Env, tx_id: u64, submitter: &Address) {
    env.events()
        .publish((symbol_short!("SUBMIT"), tx_id), submitter.clone());
}

pub fn publish_confirmation(env: &Env, tx_id: u64, owner: &Address) {
    env.events()
        .publish((symbol_short!("CONFIRM"), tx_id), owner.clone());
}

pub fn publish_revocation(env: &Env, tx_id: u64, owner: &Address) {
    env.events()
        .publish((symbol_short!("REVOKE"), tx_id), owner.clone());
}

pub fn publish_veto(env: &Env, tx_id: u64, owner: &Address) {
    env.events()
        .publish((symbol_short!("VETO"), tx_id), owner.clone());
}

pub fn publish_confirmation_time_set(env: &Env, tx_id: u64, at: u64) {
    env.events()
        .publish((symbol_short!("CONF_SET"), tx_id), at);
}

pub fn publish_confirmation_time_unset(env: &Env, tx_id: u64) {
    env.events()
        .publish((symbol_short!("CONF_UNS"), tx_id), ());
}

pub fn publish_execution(env: &Env, tx_id: u64) {
    env.events().publish((symbol_short!("EXEC_OK"), tx_id), ());
}

pub fn publish_execution_failure(env: &Env, tx_id: u64, reason: &DispatchFailure) {
    env.events()
        .publish((symbol_short!("EXEC_ERR"), tx_id), *reason);
}

pub fn publish_owner_added(env: &Env, owner: &Address) {
    env.events()
        .publish((symbol_short!("OWN_ADD"),), owner.clone());
}

pub fn publish_owner_removed(env: &Env, owner: &Address) {
    env.events()
        .publish((symbol_short!("OWN_REM"),), owner.clone());
}

pub fn publish_requirement_changed(env: &Env, required: u32) {
    env.events()
        .publish((symbol_short!("REQ_CHG"),), required);
}

pub fn publish_lock_period_changed(env: &Env, lock_period: u64) {
    env.events()
        .publish((symbol_short!("LOCK_CHG"),), lock_period);
}

pub fn publish_checkin_period_changed(env: &Env, checkin_period: u64) {
    env.events()
        .publish((symbol_short!("LIVE_CHG"),), checkin_period);
}

/// `by` is the owner who pinged; equal to `owner` for a self checkin.
pub fn publish_checkin(env: &Env, owner: &Address, by: &Address) {
    env.events()
        .publish((symbol_short!("CHECKIN"), owner.clone()), by.clone());
}

pub fn publish_withdrawal(env: &Env, token: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), token.clone()),
        (to.clone(), amount),
    );
}
