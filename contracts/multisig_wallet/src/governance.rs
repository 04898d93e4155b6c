//! Governance actions the wallet performs on itself.
//!
//! Each action validates fully before writing, so a rejected action leaves
//! owners and configuration untouched.  These functions do not check the
//! caller: they are reached either through the dispatch table or through
//! the public entry points, which require the wallet's own address.

use soroban_sdk::{token, Address, Env};

use crate::{events, owners, quorum, ContractError};

pub(crate) fn add_owner(env: &Env, owner: &Address) -> Result<(), ContractError> {
    owners::add(env, owner)?;
    events::publish_owner_added(env, owner);
    Ok(())
}

/// Remove `owner`, lowering `required` if it would exceed the new count.
pub(crate) fn remove_owner(env: &Env, owner: &Address) -> Result<(), ContractError> {
    let remaining = owners::remove(env, owner)?;
    events::publish_owner_removed(env, owner);

    if let Some(required) = quorum::clamp_to_owner_count(env, remaining)? {
        events::publish_requirement_changed(env, required);
    }
    Ok(())
}

pub(crate) fn replace_owner(env: &Env, old: &Address, new: &Address) -> Result<(), ContractError> {
    owners::replace(env, old, new)?;
    events::publish_owner_removed(env, old);
    events::publish_owner_added(env, new);
    Ok(())
}

pub(crate) fn change_required(env: &Env, required: u32) -> Result<(), ContractError> {
    let config = quorum::set_required(env, required)?;
    events::publish_requirement_changed(env, config.required);
    Ok(())
}

pub(crate) fn change_lock_period(env: &Env, lock_period: u64) -> Result<(), ContractError> {
    let config = quorum::set_lock_period(env, lock_period)?;
    events::publish_lock_period_changed(env, config.lock_period);
    Ok(())
}

pub(crate) fn change_checkin_period(env: &Env, checkin_period: u64) -> Result<(), ContractError> {
    let config = quorum::set_checkin_period(env, checkin_period)?;
    events::publish_checkin_period_changed(env, config.checkin_period);
    Ok(())
}

/// Send `amount` of `token_address` from the wallet to `to`.
pub(crate) fn withdraw(
    env: &Env,
    token_address: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidValue);
    }
    let wallet = env.current_contract_address();
    let client = token::Client::new(env, token_address);
    match client.try_transfer(&wallet, to, &amount) {
        Ok(Ok(())) => {
            events::publish_withdrawal(env, token_address, to, amount);
            Ok(())
        }
        _ => Err(ContractError::WithdrawalFailed),
    }
}
