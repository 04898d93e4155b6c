//! # Multisig Wallet Testing Framework
//!
//! A reusable testing harness for the multisig wallet contract supporting
//! property-based testing, invariant checking, state exploration, and a
//! declarative scenario DSL.
//!
//! ## Architecture
//!
//! ```text
//! test/framework/
//! ├── mod.rs             : core TestEnv, WalletTestHarness, snapshots
//! ├── generators.rs      : property-based test value generators
//! ├── invariants.rs      : state invariant definitions & verification
//! ├── state_explorer.rs  : systematic state-space exploration
//! └── scenario_dsl.rs    : declarative test scenario builder
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_framework::{TestEnv, WalletTestHarness};
//!
//! let mut env = TestEnv::new();
//! let wallet = WalletTestHarness::new(&mut env, 4, 3, 0, 0);
//! let id = wallet.submit_noop(0);
//! wallet.confirm(1, id);
//! wallet.confirm(2, id);
//! assert_eq!(wallet.status(id), TxStatus::Executed);
//! ```

extern crate std;


use multisig_wallet::{
    execution::{Payload, WalletAction},
    transaction::{StatusFilter, TxStatus},
    MultisigWallet, MultisigWalletClient,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Bytes, Env,
};

/// Ledger time every `TestEnv` starts at.  Non-zero so a stamped
/// confirmation time is always distinguishable from "unset".
pub const GENESIS_TIMESTAMP: u64 = 1_000;

// ── Core Test Environment ────────────────────────────────────────────────────

/// A high-level test environment that wraps the Soroban `Env` and provides
/// contract deployment, time control, and address management.
pub struct TestEnv {
    pub env: Env,
    generated_addresses: std::vec::Vec<Address>,
}

impl TestEnv {
    /// Create a new test environment with all auth mocked.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(GENESIS_TIMESTAMP);
        Self {
            env,
            generated_addresses: std::vec::Vec::new(),
        }
    }

    /// Generate a fresh Soroban address (cached for re-use).
    pub fn generate_address(&mut self) -> Address {
        let addr = Address::generate(&self.env);
        self.generated_addresses.push(addr.clone());
        addr
    }

    /// Generate `n` distinct addresses.
    pub fn generate_addresses(&mut self, n: usize) -> std::vec::Vec<Address> {
        (0..n).map(|_| self.generate_address()).collect()
    }

    /// Set the ledger timestamp.
    pub fn set_timestamp(&self, ts: u64) {
        self.env.ledger().set_timestamp(ts);
    }

    /// Advance the ledger timestamp by `delta` seconds.
    pub fn advance_time(&self, delta: u64) {
        let current = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(current.saturating_add(delta));
    }

    /// Current ledger timestamp.
    pub fn timestamp(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    /// Deploy a SAC token contract and return its address.
    pub fn deploy_asset(&self) -> Address {
        self.env
            .register_stellar_asset_contract_v2(Address::generate(&self.env))
            .address()
    }

    /// Mint tokens from a SAC token to a recipient.
    pub fn mint_tokens(&self, token: &Address, recipient: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, token).mint(recipient, &amount);
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ── Wallet-Specific Harness ──────────────────────────────────────────────────

/// Pre-wired multisig wallet fixture with a native asset deployed.
///
/// Owners are addressed by their index in the *initial* owner list; use
/// [`WalletTestHarness::current_owner`] to index the live list after
/// governance changes.
pub struct WalletTestHarness<'a> {
    pub env: &'a mut TestEnv,
    pub client: MultisigWalletClient<'static>,
    pub contract_id: Address,
    pub owners: std::vec::Vec<Address>,
    pub native_asset: Address,
}

impl<'a> WalletTestHarness<'a> {
    /// Deploy and initialize a wallet with `num_owners` fresh owners.
    pub fn new(
        env: &'a mut TestEnv,
        num_owners: usize,
        required: u32,
        lock_period: u64,
        checkin_period: u64,
    ) -> Self {
        let native_asset = env.deploy_asset();
        let contract_id = env.env.register(MultisigWallet, ());
        let client = MultisigWalletClient::new(&env.env, &contract_id);
        let owners = env.generate_addresses(num_owners);

        let mut initial = soroban_sdk::Vec::new(&env.env);
        for owner in &owners {
            initial.push_back(owner.clone());
        }
        client.initialize(&initial, &required, &lock_period, &checkin_period, &native_asset);

        Self {
            env,
            client,
            contract_id,
            owners,
            native_asset,
        }
    }

    /// Initial owner `i`.
    pub fn owner(&self, i: usize) -> Address {
        self.owners[i].clone()
    }

    /// Owner at slot `i % count` of the live owner list.
    pub fn current_owner(&self, i: usize) -> Address {
        let live = self.client.get_owners();
        let slot = (i % live.len() as usize) as u32;
        live.get_unchecked(slot)
    }

    /// A fresh address that is not an owner.
    pub fn outsider(&self) -> Address {
        Address::generate(&self.env.env)
    }

    fn description(&self) -> Bytes {
        Bytes::from_slice(&self.env.env, b"harness transaction")
    }

    /// Submit a zero-value transfer (always dispatches successfully).
    pub fn submit_noop(&self, by: usize) -> u64 {
        let to = self.outsider();
        self.client
            .submit_transaction(&self.owner(by), &self.description(), &to, &0i128, &Payload::Transfer)
    }

    /// Submit a native-asset transfer of `value` to `to`.
    pub fn submit_transfer(&self, by: usize, to: &Address, value: i128) -> u64 {
        self.client
            .submit_transaction(&self.owner(by), &self.description(), to, &value, &Payload::Transfer)
    }

    /// Submit a self-governance action addressed to the wallet.
    pub fn submit_action(&self, by: usize, action: WalletAction) -> u64 {
        self.client.submit_transaction(
            &self.owner(by),
            &self.description(),
            &self.contract_id,
            &0i128,
            &Payload::Wallet(action),
        )
    }

    pub fn confirm(&self, by: usize, tx_id: u64) -> TxStatus {
        self.client.confirm_transaction(&self.owner(by), &tx_id)
    }

    pub fn revoke(&self, by: usize, tx_id: u64) -> TxStatus {
        self.client.revoke_confirmation(&self.owner(by), &tx_id)
    }

    pub fn veto(&self, by: usize, tx_id: u64) {
        self.client.veto_transaction(&self.owner(by), &tx_id);
    }

    pub fn execute(&self, by: usize, tx_id: u64) -> bool {
        self.client.execute_transaction(&self.owner(by), &tx_id)
    }

    pub fn ping(&self, by: usize) {
        self.client.ping(&self.owner(by));
    }

    /// Current status of a transaction; panics on unknown ids.
    pub fn status(&self, tx_id: u64) -> TxStatus {
        self.client
            .get_transaction(&tx_id)
            .unwrap_or_else(|| panic!("transaction {} does not exist", tx_id))
            .status
    }

    pub fn confirmation_count(&self, tx_id: u64) -> u32 {
        self.client.get_confirmations(&tx_id).count
    }

    pub fn confirmation_time(&self, tx_id: u64) -> u64 {
        self.client
            .get_transaction(&tx_id)
            .map(|tx| tx.confirmation_time)
            .unwrap_or(0)
    }

    /// Snapshot of all observable wallet state for invariant checking.
    pub fn snapshot(&self) -> WalletSnapshot {
        let config = self.client.get_config();
        let total = self.client.get_transaction_count(&StatusFilter::Every);

        let transactions = (1..=total)
            .filter_map(|id| self.client.get_transaction(&id))
            .map(|tx| TxView {
                id: tx.id,
                status: tx.status,
                confirmation_time: tx.confirmation_time,
                confirmations: self.client.get_confirmations(&tx.id).count,
            })
            .collect();

        let status_counts = TxStatus::ALL.map(|s| {
            (s, self.client.get_transaction_count(&StatusFilter::Only(s)))
        });

        WalletSnapshot {
            timestamp: self.env.timestamp(),
            owners: self.client.get_owners().iter().collect(),
            required: config.required,
            effective_required: self.client.get_effective_required(),
            lock_period: config.lock_period,
            checkin_period: config.checkin_period,
            total,
            status_counts,
            transactions,
        }
    }
}

/// Observable state of one transaction.
#[derive(Debug, Clone)]
pub struct TxView {
    pub id: u64,
    pub status: TxStatus,
    pub confirmation_time: u64,
    /// Confirmations by current owners.
    pub confirmations: u32,
}

/// Immutable snapshot of wallet state at a point in time.
///
/// Used by invariant checkers and the state explorer.
#[derive(Debug, Clone)]
pub struct WalletSnapshot {
    pub timestamp: u64,
    pub owners: std::vec::Vec<Address>,
    pub required: u32,
    pub effective_required: u32,
    pub lock_period: u64,
    pub checkin_period: u64,
    pub total: u64,
    pub status_counts: [(TxStatus, u64); 4],
    pub transactions: std::vec::Vec<TxView>,
}

impl WalletSnapshot {
    /// Number of recorded transactions currently in `status`.
    pub fn count_with_status(&self, status: TxStatus) -> u64 {
        self.transactions
            .iter()
            .filter(|tx| tx.status == status)
            .count() as u64
    }

    pub fn transaction(&self, id: u64) -> Option<&TxView> {
        self.transactions.iter().find(|tx| tx.id == id)
    }
}

// ── Test Outcome Tracking ────────────────────────────────────────────────────

/// Result of a single test action, used by the state explorer and scenario DSL.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// The action succeeded.
    Ok,
    /// The action failed with a contract error code.
    ExpectedError(u32),
    /// The action failed with a host-level error.
    UnexpectedError(std::string::String),
}

/// Summary of a test run with coverage metrics.
#[derive(Debug, Clone)]
pub struct TestRunSummary {
    pub actions_executed: usize,
    pub invariant_checks: usize,
    pub invariant_violations: std::vec::Vec<std::string::String>,
    pub entry_points_hit: std::collections::HashSet<std::string::String>,
    pub transitions_observed: usize,
}

impl TestRunSummary {
    pub fn new() -> Self {
        Self {
            actions_executed: 0,
            invariant_checks: 0,
            invariant_violations: std::vec::Vec::new(),
            entry_points_hit: std::collections::HashSet::new(),
            transitions_observed: 0,
        }
    }

    /// True when no invariant violations were detected.
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    /// Coverage ratio: entry points hit / total known entry points.
    pub fn entry_point_coverage(&self, total_entry_points: usize) -> f64 {
        if total_entry_points == 0 {
            return 0.0;
        }
        self.entry_points_hit.len() as f64 / total_entry_points as f64
    }
}

impl Default for TestRunSummary {
    fn default() -> Self {
        Self::new()
    }
}
