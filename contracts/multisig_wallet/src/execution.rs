//! Transaction payloads and the dispatch adapter.
//!
//! A transaction's payload is one of three shapes:
//!
//! | Payload          | Destination        | Effect                                   |
//! |------------------|--------------------|------------------------------------------|
//! | `Transfer`       | any address        | send `value` of the native asset          |
//! | `Invoke(call)`   | another contract   | `destination.function(args…)`            |
//! | `Wallet(action)` | the wallet itself  | run a governance action (table below)    |
//!
//! Governance actions are the only way to reach the wallet's own mutators,
//! so membership and parameter changes pass through the same quorum,
//! timelock and veto discipline as any other call.
//!
//! Dispatch never aborts the pipeline: every failure is returned as a
//! [`DispatchFailure`] and recorded by the caller.

use soroban_sdk::{contracttype, log, token, Address, Env, Symbol, Val, Vec};

use crate::governance;
use crate::transaction::Transaction;

// ── Payload types ─────────────────────────────────────────────────────────────

/// A cross-contract call forwarded verbatim.
#[contracttype]
#[derive(Clone, Debug)]
pub struct ContractCall {
    pub function: Symbol,
    pub args: Vec<Val>,
}

/// Token withdrawal executed by the wallet on its own behalf.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}

/// Self-governance dispatch table.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalletAction {
    AddOwner(Address),
    RemoveOwner(Address),
    /// (old, new)
    ReplaceOwner(Address, Address),
    ChangeRequired(u32),
    ChangeLockPeriod(u64),
    ChangeCheckinPeriod(u64),
    Withdraw(Withdrawal),
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum Payload {
    Transfer,
    Invoke(ContractCall),
    Wallet(WalletAction),
}

/// Why a dispatch did not go through.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DispatchFailure {
    /// A governance action was rejected; carries the `ContractError` code.
    Rejected(u32),
    /// The destination contract trapped or returned an error.
    CallFailed,
    /// The token contract refused the transfer.
    TransferFailed,
    /// `value` was attached to a payload that cannot carry it.
    ValueNotSupported,
    /// A governance action addressed to something other than the wallet.
    ForeignWalletAction,
    /// An `Invoke` addressed to the wallet itself.
    SelfInvocation,
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Perform the call described by `tx`.
pub fn dispatch(env: &Env, native_asset: &Address, tx: &Transaction) -> Result<(), DispatchFailure> {
    let wallet = env.current_contract_address();

    let outcome = match &tx.payload {
        Payload::Transfer => transfer(env, native_asset, &wallet, &tx.destination, tx.value),
        Payload::Invoke(call) => {
            if tx.destination == wallet {
                Err(DispatchFailure::SelfInvocation)
            } else if tx.value != 0 {
                Err(DispatchFailure::ValueNotSupported)
            } else {
                invoke(env, &tx.destination, call)
            }
        }
        Payload::Wallet(action) => {
            if tx.destination != wallet {
                Err(DispatchFailure::ForeignWalletAction)
            } else if tx.value != 0 {
                Err(DispatchFailure::ValueNotSupported)
            } else {
                apply(env, action)
            }
        }
    };

    if let Err(reason) = outcome {
        log!(env, "dispatch failed", tx.id, reason);
    }
    outcome
}

fn invoke(env: &Env, destination: &Address, call: &ContractCall) -> Result<(), DispatchFailure> {
    match env.try_invoke_contract::<Val, soroban_sdk::Error>(
        destination,
        &call.function,
        call.args.clone(),
    ) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(DispatchFailure::CallFailed),
    }
}

pub(crate) fn transfer(
    env: &Env,
    token_address: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), DispatchFailure> {
    if amount == 0 {
        return Ok(());
    }
    let client = token::Client::new(env, token_address);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(DispatchFailure::TransferFailed),
    }
}

fn apply(env: &Env, action: &WalletAction) -> Result<(), DispatchFailure> {
    let result = match action {
        WalletAction::AddOwner(owner) => governance::add_owner(env, owner),
        WalletAction::RemoveOwner(owner) => governance::remove_owner(env, owner),
        WalletAction::ReplaceOwner(old, new) => governance::replace_owner(env, old, new),
        WalletAction::ChangeRequired(required) => governance::change_required(env, *required),
        WalletAction::ChangeLockPeriod(period) => governance::change_lock_period(env, *period),
        WalletAction::ChangeCheckinPeriod(period) => {
            governance::change_checkin_period(env, *period)
        }
        WalletAction::Withdraw(w) => governance::withdraw(env, &w.token, &w.to, w.amount),
    };
    result.map_err(|e| DispatchFailure::Rejected(e as u32))
}
