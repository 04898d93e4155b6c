//! Transaction ledger: records, confirmation bookkeeping, and enumeration.
//!
//! ```text
//! Unconfirmed ──► Confirmed ──► Executed
//!      ▲              │
//!      └──────────────┘ (revocation below quorum)
//!
//! Unconfirmed | Confirmed ──► Vetoed
//! ```
//! `Executed` and `Vetoed` are terminal.  Records are never deleted.

use soroban_sdk::{contracttype, symbol_short, Address, Bytes, Env, Symbol, Vec};

use crate::execution::Payload;
use crate::owners;

// ── Storage key prefixes ─────────────────────────────────────────────────────

const TX_CTR: Symbol = symbol_short!("TX_CTR");
const TX: Symbol = symbol_short!("TX");
const STATUS_CNT: Symbol = symbol_short!("STAT_CNT");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ─────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxStatus {
    Unconfirmed,
    Confirmed,
    Executed,
    Vetoed,
}

impl TxStatus {
    pub const ALL: [TxStatus; 4] = [
        TxStatus::Unconfirmed,
        TxStatus::Confirmed,
        TxStatus::Executed,
        TxStatus::Vetoed,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Executed | TxStatus::Vetoed)
    }
}

/// Selects which transactions an enumeration call returns.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusFilter {
    Every,
    Only(TxStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TxStatus) -> bool {
        match self {
            StatusFilter::Every => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// A proposed call and its approval state.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Transaction {
    pub id: u64,
    /// Informational only; never executed.
    pub description: Bytes,
    pub destination: Address,
    /// Native-asset amount carried by a `Payload::Transfer`.
    pub value: i128,
    pub payload: Payload,
    pub status: TxStatus,
    /// Every address that confirmed and has not revoked, in confirmation order.
    pub confirmed_by: Vec<Address>,
    /// Start of the running timelock; 0 when no clock is running.
    pub confirmation_time: u64,
    pub submitter: Address,
    pub submitted_at: u64,
}

/// Confirmation detail returned by `get_confirmations`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Confirmations {
    pub count: u32,
    pub owners: Vec<Address>,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn tx_key(id: u64) -> (Symbol, u64) {
    (TX, id)
}

fn status_key(status: TxStatus) -> (Symbol, TxStatus) {
    (STATUS_CNT, status)
}

pub(crate) fn next_id(env: &Env) -> u64 {
    let id = total(env).saturating_add(1);
    env.storage().instance().set(&TX_CTR, &id);
    id
}

/// Number of transactions ever submitted; also the highest id.
pub fn total(env: &Env) -> u64 {
    env.storage().instance().get(&TX_CTR).unwrap_or(0u64)
}

pub(crate) fn store(env: &Env, tx: &Transaction) {
    let key = tx_key(tx.id);
    env.storage().persistent().set(&key, tx);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn load(env: &Env, id: u64) -> Option<Transaction> {
    env.storage().persistent().get(&tx_key(id))
}

// ── Status accounting ────────────────────────────────────────────────────────

pub fn status_count(env: &Env, status: TxStatus) -> u64 {
    env.storage()
        .instance()
        .get(&status_key(status))
        .unwrap_or(0u64)
}

fn adjust_status_count(env: &Env, status: TxStatus, increment: bool) {
    let n = status_count(env, status);
    let n = if increment {
        n.saturating_add(1)
    } else {
        n.saturating_sub(1)
    };
    env.storage().instance().set(&status_key(status), &n);
}

/// Record a freshly created transaction in the per-status counters.
pub(crate) fn track_new(env: &Env, status: TxStatus) {
    adjust_status_count(env, status, true);
}

/// Move `tx` to `status`, keeping the per-status counters in step.
pub(crate) fn set_status(env: &Env, tx: &mut Transaction, status: TxStatus) {
    if tx.status == status {
        return;
    }
    adjust_status_count(env, tx.status, false);
    adjust_status_count(env, status, true);
    tx.status = status;
}

// ── Confirmations ────────────────────────────────────────────────────────────

pub fn has_confirmed(tx: &Transaction, owner: &Address) -> bool {
    tx.confirmed_by.contains(owner)
}

pub(crate) fn add_confirmation(tx: &mut Transaction, owner: &Address) {
    tx.confirmed_by.push_back(owner.clone());
}

pub(crate) fn remove_confirmation(tx: &mut Transaction, owner: &Address) -> bool {
    match tx.confirmed_by.first_index_of(owner) {
        Some(i) => {
            tx.confirmed_by.remove(i);
            true
        }
        None => false,
    }
}

/// Confirmers that are still owners; removed owners no longer count.
pub fn confirming_owners(env: &Env, tx: &Transaction) -> Vec<Address> {
    let mut current = Vec::new(env);
    for addr in tx.confirmed_by.iter() {
        if owners::is_owner(env, &addr) {
            current.push_back(addr);
        }
    }
    current
}

pub fn confirmation_count(env: &Env, tx: &Transaction) -> u32 {
    confirming_owners(env, tx).len()
}

// ── Enumeration ──────────────────────────────────────────────────────────────

/// Number of transactions matching `filter`.
pub fn count_matching(env: &Env, filter: StatusFilter) -> u64 {
    match filter {
        StatusFilter::Every => total(env),
        StatusFilter::Only(status) => status_count(env, status),
    }
}

/// Ids of matching transactions in ascending order, skipping the first
/// `offset` matches and returning at most `limit`.
pub fn ids_matching(env: &Env, offset: u32, limit: u32, filter: StatusFilter) -> Vec<u64> {
    let mut ids = Vec::new(env);
    if limit == 0 {
        return ids;
    }
    let last = total(env);

    if let StatusFilter::Every = filter {
        let mut id = (offset as u64).saturating_add(1);
        while id <= last && ids.len() < limit {
            ids.push_back(id);
            id += 1;
        }
        return ids;
    }

    let mut skipped = 0u32;
    for id in 1..=last {
        let Some(tx) = load(env, id) else {
            continue;
        };
        if !filter.matches(tx.status) {
            continue;
        }
        if skipped < offset {
            skipped += 1;
            continue;
        }
        ids.push_back(id);
        if ids.len() >= limit {
            break;
        }
    }
    ids
}
