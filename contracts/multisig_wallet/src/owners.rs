//! Owner registry: the bounded, ordered set of signers and their liveness.
//!
//! The ordered list lives in instance storage and is what `get_owners`
//! enumerates.  Each owner additionally has a persistent index entry
//! (address → slot) for O(1) membership tests and removals, and a persistent
//! checkin timestamp used by the survivorship policy.
//!
//! ## Rules
//! - Between 1 and [`MAX_OWNERS`] owners at all times.
//! - No duplicates and never the null account.
//! - New owners are appended; removal moves the last owner into the freed
//!   slot; replacement keeps the slot.
//!
//! Callers are responsible for authorization and for emitting events; this
//! module only enforces the registry's own invariants.

use soroban_sdk::{symbol_short, Address, Env, String, Symbol, Vec};

use crate::ContractError;

// ── Storage key prefixes ─────────────────────────────────────────────────────

/// Ordered owner list (instance storage).
const OWNERS: Symbol = symbol_short!("OWNERS");
/// Maps owner → position in the ordered list.
const OWNER_IDX: Symbol = symbol_short!("OWN_IDX");
/// Maps owner → ledger timestamp of their last qualifying action.
const CHECKIN: Symbol = symbol_short!("CHECKIN");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Upper bound on the number of owners.
pub const MAX_OWNERS: u32 = 50;

/// Strkey of the all-zero ed25519 account, treated as the null identity.
pub const NULL_OWNER: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

// ── Storage helpers ──────────────────────────────────────────────────────────

fn index_key(owner: &Address) -> (Symbol, Address) {
    (OWNER_IDX, owner.clone())
}

fn checkin_key(owner: &Address) -> (Symbol, Address) {
    (CHECKIN, owner.clone())
}

fn extend(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn store_list(env: &Env, owners: &Vec<Address>) {
    env.storage().instance().set(&OWNERS, owners);
}

fn set_index(env: &Env, owner: &Address, index: u32) {
    let key = index_key(owner);
    env.storage().persistent().set(&key, &index);
    extend(env, &key);
}

fn index_of(env: &Env, owner: &Address) -> Option<u32> {
    env.storage().persistent().get(&index_key(owner))
}

/// The null identity as an `Address`.
pub fn null_owner(env: &Env) -> Address {
    Address::from_string(&String::from_str(env, NULL_OWNER))
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// All owners in enumeration order.
pub fn load(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&OWNERS)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn count(env: &Env) -> u32 {
    load(env).len()
}

pub fn is_owner(env: &Env, candidate: &Address) -> bool {
    env.storage().persistent().has(&index_key(candidate))
}

pub fn require_owner(env: &Env, candidate: &Address) -> Result<(), ContractError> {
    if !is_owner(env, candidate) {
        return Err(ContractError::NotOwner);
    }
    Ok(())
}

/// Timestamp of the owner's last qualifying action, if they are an owner.
pub fn last_checkin(env: &Env, owner: &Address) -> Option<u64> {
    env.storage().persistent().get(&checkin_key(owner))
}

/// Whether `owner` counts toward the survivorship denominator at `now`.
///
/// A zero `checkin_period` disables survivorship, so every owner is active.
pub fn is_active(env: &Env, owner: &Address, now: u64, checkin_period: u64) -> bool {
    if checkin_period == 0 {
        return true;
    }
    match last_checkin(env, owner) {
        Some(at) => now.saturating_sub(at) <= checkin_period,
        None => false,
    }
}

/// Number of owners active at `now`.
pub fn active_count(env: &Env, now: u64, checkin_period: u64) -> u32 {
    let owners = load(env);
    if checkin_period == 0 {
        return owners.len();
    }
    let mut active = 0u32;
    for owner in owners.iter() {
        if is_active(env, &owner, now, checkin_period) {
            active += 1;
        }
    }
    active
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Checks that `candidate` may join the registry (ignoring the size bound).
pub fn validate_new_owner(env: &Env, candidate: &Address) -> Result<(), ContractError> {
    if *candidate == null_owner(env) {
        return Err(ContractError::NullOwner);
    }
    if is_owner(env, candidate) {
        return Err(ContractError::DuplicateOwner);
    }
    Ok(())
}

// ── Mutations ────────────────────────────────────────────────────────────────

/// Stamp `owner`'s checkin with the current ledger time.
pub fn record_activity(env: &Env, owner: &Address) {
    let key = checkin_key(owner);
    env.storage()
        .persistent()
        .set(&key, &env.ledger().timestamp());
    extend(env, &key);
}

/// Append `owner` to the registry.
pub fn add(env: &Env, owner: &Address) -> Result<(), ContractError> {
    validate_new_owner(env, owner)?;
    let mut owners = load(env);
    if owners.len() >= MAX_OWNERS {
        return Err(ContractError::TooManyOwners);
    }

    set_index(env, owner, owners.len());
    owners.push_back(owner.clone());
    store_list(env, &owners);
    record_activity(env, owner);
    Ok(())
}

/// Remove `owner`, moving the last owner into the freed slot.
///
/// Returns the new owner count.
pub fn remove(env: &Env, owner: &Address) -> Result<u32, ContractError> {
    let index = index_of(env, owner).ok_or(ContractError::NotOwner)?;
    let mut owners = load(env);
    if owners.len() <= 1 {
        return Err(ContractError::LastOwner);
    }

    let last = owners.len() - 1;
    if index != last {
        if let Some(moved) = owners.get(last) {
            owners.set(index, moved.clone());
            set_index(env, &moved, index);
        }
    }
    owners.pop_back();
    store_list(env, &owners);

    env.storage().persistent().remove(&index_key(owner));
    env.storage().persistent().remove(&checkin_key(owner));
    Ok(owners.len())
}

/// Swap `old` for `new` in place; `new` starts with a fresh checkin.
pub fn replace(env: &Env, old: &Address, new: &Address) -> Result<(), ContractError> {
    let index = index_of(env, old).ok_or(ContractError::NotOwner)?;
    validate_new_owner(env, new)?;

    let mut owners = load(env);
    owners.set(index, new.clone());
    store_list(env, &owners);

    env.storage().persistent().remove(&index_key(old));
    env.storage().persistent().remove(&checkin_key(old));
    set_index(env, new, index);
    record_activity(env, new);
    Ok(())
}
