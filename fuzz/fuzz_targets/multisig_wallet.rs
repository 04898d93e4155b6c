#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use multisig_wallet::{
    execution::{Payload, WalletAction},
    transaction::{StatusFilter, TxStatus},
    MultisigWallet, MultisigWalletClient,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, Bytes, Env, Vec as SorobanVec,
};

/// Actions covering the approval pipeline plus self-governance proposals.
///
/// Owner and transaction indices are taken modulo the live state so most
/// inputs reach the wallet's validation logic instead of failing on lookup.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Submit { owner: u8, value: i16 },
    ProposeRequired { owner: u8, required: u8 },
    ProposeRemove { owner: u8, target: u8 },
    Confirm { owner: u8, tx: u8 },
    Revoke { owner: u8, tx: u8 },
    Veto { owner: u8, tx: u8 },
    Execute { owner: u8, tx: u8 },
    Ping { owner: u8 },
    AdvanceTime { delta: u16 },
}

const LOCK_PERIOD: u64 = 1_800;
const CHECKIN_PERIOD: u64 = 7_200;

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let asset = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(MultisigWallet, ());
    let client = MultisigWalletClient::new(&env, &contract_id);

    let mut signers = SorobanVec::new(&env);
    for _ in 0..5 {
        signers.push_back(Address::generate(&env));
    }
    if client
        .try_initialize(&signers, &3, &LOCK_PERIOD, &CHECKIN_PERIOD, &asset)
        .is_err()
    {
        return;
    }

    let desc = Bytes::from_slice(&env, b"fuzz");
    let outsider = Address::generate(&env);
    let mut terminal: std::vec::Vec<(u64, TxStatus)> = std::vec::Vec::new();

    for action in actions.into_iter() {
        let owners = client.get_owners();
        let owner = |i: u8| owners.get_unchecked(i as u32 % owners.len());
        let total = client.get_transaction_count(&StatusFilter::Every);
        let tx = |i: u8| (i as u64 % (total + 1)) + 1;

        match action {
            FuzzAction::Submit { owner: o, value } => {
                let _ = client.try_submit_transaction(
                    &owner(o),
                    &desc,
                    &outsider,
                    &(value as i128),
                    &Payload::Transfer,
                );
            }
            FuzzAction::ProposeRequired { owner: o, required } => {
                let _ = client.try_submit_transaction(
                    &owner(o),
                    &desc,
                    &contract_id,
                    &0,
                    &Payload::Wallet(WalletAction::ChangeRequired(required as u32 % 8)),
                );
            }
            FuzzAction::ProposeRemove { owner: o, target } => {
                let _ = client.try_submit_transaction(
                    &owner(o),
                    &desc,
                    &contract_id,
                    &0,
                    &Payload::Wallet(WalletAction::RemoveOwner(owner(target))),
                );
            }
            FuzzAction::Confirm { owner: o, tx: t } => {
                let _ = client.try_confirm_transaction(&owner(o), &tx(t));
            }
            FuzzAction::Revoke { owner: o, tx: t } => {
                let _ = client.try_revoke_confirmation(&owner(o), &tx(t));
            }
            FuzzAction::Veto { owner: o, tx: t } => {
                let _ = client.try_veto_transaction(&owner(o), &tx(t));
            }
            FuzzAction::Execute { owner: o, tx: t } => {
                let _ = client.try_execute_transaction(&owner(o), &tx(t));
            }
            FuzzAction::Ping { owner: o } => {
                let _ = client.try_ping(&owner(o));
            }
            FuzzAction::AdvanceTime { delta } => {
                let ts = env.ledger().timestamp().saturating_add(delta as u64);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        let owner_count = client.get_owner_count();
        let required = client.get_required();
        let effective = client.get_effective_required();
        assert!(owner_count >= 1, "INVARIANT VIOLATION: wallet has no owners");
        assert!(
            required >= 1 && required <= owner_count,
            "INVARIANT VIOLATION: required {} outside 1..={}",
            required,
            owner_count
        );
        assert!(
            effective >= 1 && effective <= required,
            "INVARIANT VIOLATION: effective quorum {} above required {}",
            effective,
            required
        );

        let total = client.get_transaction_count(&StatusFilter::Every);
        let bucketed: u64 = TxStatus::ALL
            .iter()
            .map(|s| client.get_transaction_count(&StatusFilter::Only(*s)))
            .sum();
        assert_eq!(bucketed, total, "INVARIANT VIOLATION: status counts drifted");

        for id in 1..=total {
            let Some(record) = client.get_transaction(&id) else {
                panic!("INVARIANT VIOLATION: transaction {} missing", id);
            };
            assert_eq!(
                record.confirmation_time != 0,
                record.status == TxStatus::Confirmed,
                "INVARIANT VIOLATION: clock state disagrees with status on {}",
                id
            );
            if record.status.is_terminal() && !terminal.iter().any(|(t, _)| *t == id) {
                terminal.push((id, record.status));
            }
        }
        for (id, status) in &terminal {
            let current = client.get_transaction(id).map(|t| t.status);
            assert_eq!(
                current,
                Some(*status),
                "INVARIANT VIOLATION: terminal transaction {} changed",
                id
            );
        }
    }
});
