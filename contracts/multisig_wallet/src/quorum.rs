//! Quorum policy: threshold, timelock and survivorship configuration.
//!
//! ## Survivorship rule
//! ```text
//! effective_required = required                              if checkin_period == 0
//!                    = max(1, min(required, active_owners))  otherwise
//! ```
//! Owners who have not checked in within `checkin_period` seconds drop out
//! of the denominator, so the wallet cannot be stranded by absent signers.
//! The configured threshold is never raised.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::{owners, ContractError};

const CONFIG: Symbol = symbol_short!("CONFIG");

/// Governance parameters of the wallet.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WalletConfig {
    /// Confirmations needed to authorize a transaction.
    pub required: u32,
    /// Seconds between reaching quorum and execution; 0 executes on quorum.
    pub lock_period: u64,
    /// Seconds an owner stays active after a checkin; 0 disables survivorship.
    pub checkin_period: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Result<WalletConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn store(env: &Env, config: &WalletConfig) {
    env.storage().instance().set(&CONFIG, config);
}

// ── Policy ───────────────────────────────────────────────────────────────────

/// Reject thresholds that can never or always be met.
pub fn validate_required(required: u32, owner_count: u32) -> Result<(), ContractError> {
    if required == 0 {
        return Err(ContractError::RequiredIsZero);
    }
    if required > owner_count {
        return Err(ContractError::RequiredExceedsOwners);
    }
    Ok(())
}

/// Pure form of the survivorship rule.
pub fn survivorship_required(required: u32, active_owners: u32) -> u32 {
    required.min(active_owners).max(1)
}

/// Confirmations needed at `now` given current owner liveness.
pub fn effective_required(env: &Env, config: &WalletConfig, now: u64) -> u32 {
    if config.checkin_period == 0 {
        return config.required;
    }
    let active = owners::active_count(env, now, config.checkin_period);
    survivorship_required(config.required, active)
}

pub fn is_quorum_met(env: &Env, config: &WalletConfig, confirmations: u32, now: u64) -> bool {
    confirmations >= effective_required(env, config, now)
}

/// Whether the timelock started at `confirmed_at` has run out by `now`.
pub fn timelock_elapsed(config: &WalletConfig, confirmed_at: u64, now: u64) -> bool {
    now >= confirmed_at.saturating_add(config.lock_period)
}

// ── Mutations ────────────────────────────────────────────────────────────────

pub(crate) fn set_required(env: &Env, required: u32) -> Result<WalletConfig, ContractError> {
    let mut config = load(env)?;
    validate_required(required, owners::count(env))?;
    if required == config.required {
        return Err(ContractError::NoChange);
    }
    config.required = required;
    store(env, &config);
    Ok(config)
}

pub(crate) fn set_lock_period(env: &Env, lock_period: u64) -> Result<WalletConfig, ContractError> {
    let mut config = load(env)?;
    if lock_period == config.lock_period {
        return Err(ContractError::NoChange);
    }
    config.lock_period = lock_period;
    store(env, &config);
    Ok(config)
}

pub(crate) fn set_checkin_period(
    env: &Env,
    checkin_period: u64,
) -> Result<WalletConfig, ContractError> {
    let mut config = load(env)?;
    if checkin_period == config.checkin_period {
        return Err(ContractError::NoChange);
    }
    config.checkin_period = checkin_period;
    store(env, &config);
    Ok(config)
}

/// Lower `required` to `owner_count` if a removal left it out of range.
///
/// Returns the new threshold when it changed.
pub(crate) fn clamp_to_owner_count(
    env: &Env,
    owner_count: u32,
) -> Result<Option<u32>, ContractError> {
    let mut config = load(env)?;
    if config.required <= owner_count {
        return Ok(None);
    }
    config.required = owner_count;
    store(env, &config);
    Ok(Some(owner_count))
}
