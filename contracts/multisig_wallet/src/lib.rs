#![no_std]

//! # Multisig Wallet
//!
//! A wallet jointly controlled by a fixed set of owners.  Any state change
//! needs a quorum of owner confirmations before it takes effect:
//!
//! - **Submit → confirm → execute**: submission counts as the submitter's
//!   confirmation; the confirmation that reaches quorum dispatches the call
//! - **Timelock**: with a non-zero `lock_period`, reaching quorum only starts
//!   a clock and `execute_transaction` dispatches once it has run out
//! - **Revocation**: dropping below quorum before execution resets the clock
//! - **Veto**: any single owner can cancel a pending transaction for good
//! - **Survivorship**: owners who have not checked in within
//!   `checkin_period` stop counting toward the required confirmations
//! - **Self-governance**: owner and parameter changes are themselves
//!   transactions addressed to the wallet (see [`execution::WalletAction`])

pub mod events;
pub mod execution;
pub mod governance;
pub mod owners;
pub mod quorum;
pub mod transaction;

use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Bytes, Env, Symbol, Vec};

use execution::Payload;
use quorum::WalletConfig;
use transaction::{Confirmations, StatusFilter, Transaction, TxStatus};

// ── Storage key constants ─────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const NATIVE_ASSET: Symbol = symbol_short!("NATIVE");

// TTL for instance storage: ~60 days at 5s/ledger
const INSTANCE_TTL_THRESHOLD: u32 = 1_036_800;
const INSTANCE_TTL_EXTEND_TO: u32 = 2_073_600;

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    // Authorization
    NotOwner = 3,
    MustBeWallet = 4,
    // Validation
    NullOwner = 5,
    DuplicateOwner = 6,
    TooManyOwners = 7,
    LastOwner = 8,
    RequiredIsZero = 9,
    RequiredExceedsOwners = 10,
    NoChange = 11,
    InvalidValue = 12,
    // Transaction state
    InvalidTransaction = 13,
    AlreadyExecuted = 14,
    VetoedTransaction = 15,
    AlreadyConfirmed = 16,
    NotConfirmed = 17,
    TooEarly = 18,
    QuorumNotMet = 19,
    // Governance
    WithdrawalFailed = 20,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct MultisigWallet;

#[contractimpl]
impl MultisigWallet {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the wallet. Every signer must authorize the call.
    ///
    /// * `signers`: 1 to 50 distinct, non-null signer addresses.
    /// * `required`: confirmations needed, `1..=owners.len()`.
    /// * `lock_period`: seconds between quorum and execution; 0 disables.
    /// * `checkin_period`: survivorship window in seconds; 0 disables.
    /// * `native_asset`: token contract moved by `Payload::Transfer`.
    pub fn initialize(
        env: Env,
        signers: Vec<Address>,
        required: u32,
        lock_period: u64,
        checkin_period: u64,
        native_asset: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if signers.len() > owners::MAX_OWNERS {
            return Err(ContractError::TooManyOwners);
        }
        let null = owners::null_owner(&env);
        for (i, signer) in signers.iter().enumerate() {
            if signer == null {
                return Err(ContractError::NullOwner);
            }
            if signers.first_index_of(&signer) != Some(i as u32) {
                return Err(ContractError::DuplicateOwner);
            }
        }
        quorum::validate_required(required, signers.len())?;

        // Every signer consents to joining the wallet.
        for signer in signers.iter() {
            signer.require_auth();
        }
        for owner in signers.iter() {
            owners::add(&env, &owner)?;
        }
        quorum::store(
            &env,
            &WalletConfig {
                required,
                lock_period,
                checkin_period,
            },
        );
        env.storage().instance().set(&NATIVE_ASSET, &native_asset);
        env.storage().instance().set(&INITIALIZED, &true);
        Self::extend_instance(&env);

        Ok(())
    }

    // ── Transaction pipeline ──────────────────────────────────────────────────

    /// Propose a call and confirm it on the submitter's behalf.
    ///
    /// Returns the new transaction id.  With a single required confirmation
    /// and no timelock the call is dispatched before this returns.
    pub fn submit_transaction(
        env: Env,
        caller: Address,
        description: Bytes,
        destination: Address,
        value: i128,
        payload: Payload,
    ) -> Result<u64, ContractError> {
        let config = Self::require_initialized(&env)?;
        let native_asset = Self::native_asset(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;
        if value < 0 {
            return Err(ContractError::InvalidValue);
        }

        let now = env.ledger().timestamp();
        let id = transaction::next_id(&env);
        let mut tx = Transaction {
            id,
            description,
            destination,
            value,
            payload,
            status: TxStatus::Unconfirmed,
            confirmed_by: Vec::new(&env),
            confirmation_time: 0,
            submitter: caller.clone(),
            submitted_at: now,
        };
        transaction::track_new(&env, TxStatus::Unconfirmed);
        owners::record_activity(&env, &caller);
        events::publish_submission(&env, id, &caller);

        Self::confirm(&env, &config, &native_asset, &mut tx, &caller);
        transaction::store(&env, &tx);
        Self::extend_instance(&env);

        Ok(id)
    }

    /// Add the caller's confirmation; returns the resulting status.
    pub fn confirm_transaction(
        env: Env,
        caller: Address,
        tx_id: u64,
    ) -> Result<TxStatus, ContractError> {
        let config = Self::require_initialized(&env)?;
        let native_asset = Self::native_asset(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;

        let mut tx = Self::load_pending(&env, tx_id)?;
        if transaction::has_confirmed(&tx, &caller) {
            return Err(ContractError::AlreadyConfirmed);
        }

        owners::record_activity(&env, &caller);
        Self::confirm(&env, &config, &native_asset, &mut tx, &caller);
        transaction::store(&env, &tx);
        Self::extend_instance(&env);

        Ok(tx.status)
    }

    /// Withdraw the caller's confirmation; returns the resulting status.
    ///
    /// Falling below quorum while timelocked returns the transaction to
    /// Unconfirmed and discards the running clock.
    pub fn revoke_confirmation(
        env: Env,
        caller: Address,
        tx_id: u64,
    ) -> Result<TxStatus, ContractError> {
        let config = Self::require_initialized(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;

        let mut tx = Self::load_pending(&env, tx_id)?;
        if !transaction::remove_confirmation(&mut tx, &caller) {
            return Err(ContractError::NotConfirmed);
        }

        owners::record_activity(&env, &caller);
        events::publish_revocation(&env, tx_id, &caller);

        let now = env.ledger().timestamp();
        let count = transaction::confirmation_count(&env, &tx);
        if tx.status == TxStatus::Confirmed && !quorum::is_quorum_met(&env, &config, count, now) {
            transaction::set_status(&env, &mut tx, TxStatus::Unconfirmed);
            Self::clear_confirmation_time(&env, &mut tx);
            log!(&env, "quorum lost", tx_id, count);
        }

        transaction::store(&env, &tx);
        Self::extend_instance(&env);

        Ok(tx.status)
    }

    /// Dispatch a Confirmed transaction whose timelock has run out.
    ///
    /// Returns whether the dispatched call succeeded.  The transaction is
    /// Executed either way; a failed call is not retried.
    pub fn execute_transaction(env: Env, caller: Address, tx_id: u64) -> Result<bool, ContractError> {
        let config = Self::require_initialized(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;

        let mut tx = Self::load_pending(&env, tx_id)?;
        if tx.status != TxStatus::Confirmed {
            return Err(ContractError::QuorumNotMet);
        }
        let now = env.ledger().timestamp();
        if !quorum::timelock_elapsed(&config, tx.confirmation_time, now) {
            return Err(ContractError::TooEarly);
        }

        let native_asset = Self::native_asset(&env)?;
        let succeeded = Self::execute(&env, &native_asset, &mut tx);
        Self::extend_instance(&env);

        Ok(succeeded)
    }

    /// Permanently cancel a pending transaction, regardless of confirmations.
    pub fn veto_transaction(env: Env, caller: Address, tx_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;

        let mut tx = Self::load_pending(&env, tx_id)?;
        owners::record_activity(&env, &caller);

        if tx.confirmation_time != 0 {
            Self::clear_confirmation_time(&env, &mut tx);
        }
        transaction::set_status(&env, &mut tx, TxStatus::Vetoed);
        transaction::store(&env, &tx);
        events::publish_veto(&env, tx_id, &caller);
        Self::extend_instance(&env);

        Ok(())
    }

    // ── Liveness ──────────────────────────────────────────────────────────────

    /// Refresh the caller's checkin.
    pub fn ping(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;

        owners::record_activity(&env, &caller);
        events::publish_checkin(&env, &caller, &caller);
        Ok(())
    }

    /// Refresh `owner`'s checkin on their behalf (the caller is refreshed too).
    pub fn ping_for(env: Env, caller: Address, owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        owners::require_owner(&env, &caller)?;
        owners::require_owner(&env, &owner)?;

        owners::record_activity(&env, &caller);
        owners::record_activity(&env, &owner);
        events::publish_checkin(&env, &owner, &caller);
        Ok(())
    }

    // ── Governance (wallet-only) ──────────────────────────────────────────────

    /// Reachable only as `WalletAction::AddOwner` through the pipeline.
    pub fn add_owner(env: Env, caller: Address, owner: Address) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::add_owner(&env, &owner)
    }

    pub fn remove_owner(env: Env, caller: Address, owner: Address) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::remove_owner(&env, &owner)
    }

    pub fn replace_owner(
        env: Env,
        caller: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::replace_owner(&env, &old_owner, &new_owner)
    }

    pub fn change_required(env: Env, caller: Address, required: u32) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::change_required(&env, required)
    }

    pub fn change_lock_period(
        env: Env,
        caller: Address,
        lock_period: u64,
    ) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::change_lock_period(&env, lock_period)
    }

    pub fn change_checkin_period(
        env: Env,
        caller: Address,
        checkin_period: u64,
    ) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::change_checkin_period(&env, checkin_period)
    }

    pub fn withdraw(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_wallet(&env, &caller)?;
        governance::withdraw(&env, &token, &to, amount)
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_owners(env: Env) -> Vec<Address> {
        owners::load(&env)
    }

    pub fn get_owner_count(env: Env) -> u32 {
        owners::count(&env)
    }

    pub fn is_owner(env: Env, candidate: Address) -> bool {
        owners::is_owner(&env, &candidate)
    }

    pub fn get_last_checkin(env: Env, owner: Address) -> Option<u64> {
        owners::last_checkin(&env, &owner)
    }

    /// Whether `owner` currently counts toward the survivorship denominator.
    pub fn is_active(env: Env, owner: Address) -> Result<bool, ContractError> {
        let config = Self::require_initialized(&env)?;
        owners::require_owner(&env, &owner)?;
        let now = env.ledger().timestamp();
        Ok(owners::is_active(&env, &owner, now, config.checkin_period))
    }

    pub fn get_config(env: Env) -> Result<WalletConfig, ContractError> {
        quorum::load(&env)
    }

    pub fn get_required(env: Env) -> Result<u32, ContractError> {
        Ok(quorum::load(&env)?.required)
    }

    /// Confirmations needed right now, after the survivorship adjustment.
    pub fn get_effective_required(env: Env) -> Result<u32, ContractError> {
        let config = quorum::load(&env)?;
        Ok(quorum::effective_required(
            &env,
            &config,
            env.ledger().timestamp(),
        ))
    }

    pub fn get_lock_period(env: Env) -> Result<u64, ContractError> {
        Ok(quorum::load(&env)?.lock_period)
    }

    pub fn get_checkin_period(env: Env) -> Result<u64, ContractError> {
        Ok(quorum::load(&env)?.checkin_period)
    }

    pub fn get_native_asset(env: Env) -> Result<Address, ContractError> {
        Self::native_asset(&env)
    }

    pub fn get_transaction(env: Env, tx_id: u64) -> Option<Transaction> {
        transaction::load(&env, tx_id)
    }

    pub fn get_transaction_count(env: Env, filter: StatusFilter) -> u64 {
        transaction::count_matching(&env, filter)
    }

    /// Matching ids in ascending order, paginated over the matches.
    pub fn get_transaction_ids(env: Env, offset: u32, limit: u32, filter: StatusFilter) -> Vec<u64> {
        transaction::ids_matching(&env, offset, limit, filter)
    }

    pub fn get_confirmations(env: Env, tx_id: u64) -> Result<Confirmations, ContractError> {
        let tx = transaction::load(&env, tx_id).ok_or(ContractError::InvalidTransaction)?;
        let owners = transaction::confirming_owners(&env, &tx);
        Ok(Confirmations {
            count: owners.len(),
            owners,
        })
    }

    /// Whether the transaction's current confirmations meet quorum now.
    pub fn is_confirmed(env: Env, tx_id: u64) -> Result<bool, ContractError> {
        let config = quorum::load(&env)?;
        let tx = transaction::load(&env, tx_id).ok_or(ContractError::InvalidTransaction)?;
        if tx.status == TxStatus::Vetoed {
            return Ok(false);
        }
        let count = transaction::confirmation_count(&env, &tx);
        Ok(quorum::is_quorum_met(
            &env,
            &config,
            count,
            env.ledger().timestamp(),
        ))
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<WalletConfig, ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        quorum::load(env)
    }

    /// Governance entry points accept only the wallet's own address.
    fn require_wallet(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        if *caller != env.current_contract_address() {
            return Err(ContractError::MustBeWallet);
        }
        caller.require_auth();
        Ok(())
    }

    fn native_asset(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&NATIVE_ASSET)
            .ok_or(ContractError::NotInitialized)
    }

    fn extend_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }

    /// Load a transaction that can still change state.
    fn load_pending(env: &Env, tx_id: u64) -> Result<Transaction, ContractError> {
        let tx = transaction::load(env, tx_id).ok_or(ContractError::InvalidTransaction)?;
        match tx.status {
            TxStatus::Executed => Err(ContractError::AlreadyExecuted),
            TxStatus::Vetoed => Err(ContractError::VetoedTransaction),
            _ => Ok(tx),
        }
    }

    /// Record `owner`'s confirmation and act on quorum.
    ///
    /// The caller persists `tx` afterwards.
    fn confirm(
        env: &Env,
        config: &WalletConfig,
        native_asset: &Address,
        tx: &mut Transaction,
        owner: &Address,
    ) {
        transaction::add_confirmation(tx, owner);
        events::publish_confirmation(env, tx.id, owner);

        if tx.status != TxStatus::Unconfirmed {
            return;
        }
        let now = env.ledger().timestamp();
        let count = transaction::confirmation_count(env, tx);
        if !quorum::is_quorum_met(env, config, count, now) {
            return;
        }

        if config.lock_period == 0 {
            Self::execute(env, native_asset, tx);
        } else {
            transaction::set_status(env, tx, TxStatus::Confirmed);
            tx.confirmation_time = now;
            events::publish_confirmation_time_set(env, tx.id, now);
            log!(env, "timelock started", tx.id, now);
        }
    }

    /// Mark `tx` Executed, then dispatch its call and record the outcome.
    fn execute(env: &Env, native_asset: &Address, tx: &mut Transaction) -> bool {
        transaction::set_status(env, tx, TxStatus::Executed);
        tx.confirmation_time = 0;
        transaction::store(env, tx);

        match execution::dispatch(env, native_asset, tx) {
            Ok(()) => {
                events::publish_execution(env, tx.id);
                true
            }
            Err(reason) => {
                events::publish_execution_failure(env, tx.id, &reason);
                false
            }
        }
    }

    fn clear_confirmation_time(env: &Env, tx: &mut Transaction) {
        tx.confirmation_time = 0;
        events::publish_confirmation_time_unset(env, tx.id);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
