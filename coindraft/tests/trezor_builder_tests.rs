mod common;

use std::sync::Arc;

use bitcoin::Network;
use coindraft::signing::multisig;
use coindraft::{
    Bip32Spec, Config, CoindraftError, DraftError, InputScriptType, OutputScriptType, Output,
    SigningError, TrezorDraftBuilder, TrezorRequest, Utxo,
};
use common::{
    mixed_utxos, prev_transactions_for, xpubs, RecordingBackend, P2PKH_ADDRESS, P2SH_ADDRESS,
    PAYMENT_ADDRESS, SCRIPT, TXID_1, TXID_2, TXID_3, TXID_4, TXID_MULTISIG,
};

const MULTISIG_PATH: [u32; 3] = [42, 1, 1];

fn multisig_address() -> String {
    multisig::derive_address(&xpubs(), &MULTISIG_PATH, 2, Network::Testnet).unwrap()
}

fn bip32_addresses() -> Vec<Bip32Spec> {
    vec![
        Bip32Spec::Single {
            address: P2PKH_ADDRESS.to_string(),
            path: vec![41, 1, 1],
        },
        Bip32Spec::Single {
            address: P2SH_ADDRESS.to_string(),
            path: vec![42, 1, 1],
        },
        Bip32Spec::Multisig {
            xpubs: xpubs(),
            path: MULTISIG_PATH.to_vec(),
            threshold: 2,
        },
    ]
}

/// The engine fixture: three P2SH outputs, one single-key output and one
/// multisig output, in that order.
fn fixture_utxos() -> Vec<Utxo> {
    let mut utxos = mixed_utxos();
    utxos.push(Utxo::new(multisig_address(), TXID_MULTISIG, 0, 1_0000_0000, SCRIPT));
    utxos
}

fn fixture_backend() -> Arc<RecordingBackend> {
    Arc::new(RecordingBackend::with_unspent_and_transactions(
        fixture_utxos(),
        prev_transactions_for(&[TXID_1, TXID_2, TXID_3, TXID_4, TXID_MULTISIG]),
    ))
}

fn builder_with(backend: Arc<RecordingBackend>) -> TrezorDraftBuilder {
    TrezorDraftBuilder::new(Config::new(backend).with_network(Network::Testnet))
}

fn payment_request(amount: u64) -> TrezorRequest {
    TrezorRequest {
        bip32_addresses: bip32_addresses(),
        outputs: vec![Output::new(PAYMENT_ADDRESS, amount)],
        ..TrezorRequest::default()
    }
}

#[test]
fn formats_a_mixed_input_set_for_the_device() {
    let backend = fixture_backend();
    let outcome = builder_with(backend).build(&payment_request(7_5000_0000)).unwrap();

    assert!(outcome.is_valid());
    let descriptor = outcome.as_descriptor().unwrap();

    assert_eq!(descriptor.input_total, 8_5000_0000);
    assert_eq!(descriptor.output_total, 8_4999_0000);
    assert_eq!(descriptor.fee, 10_000);
    // Change goes to the first declared address.
    assert_eq!(
        descriptor.outputs,
        vec![
            Output::new(PAYMENT_ADDRESS, 7_5000_0000),
            Output::new(P2PKH_ADDRESS, 9999_0000),
        ]
    );

    assert_eq!(descriptor.trezor_inputs.len(), 5);

    // Script-hash inputs are spent as nested segwit and carry the amount.
    for input in &descriptor.trezor_inputs[0..3] {
        assert_eq!(input.address_n, vec![42, 1, 1]);
        assert_eq!(input.script_type, Some(InputScriptType::SpendP2shWitness));
        assert_eq!(input.amount, Some("200000000".to_string()));
        assert!(input.multisig.is_none());
    }
    assert_eq!(descriptor.trezor_inputs[0].prev_hash, TXID_1);
    assert_eq!(descriptor.trezor_inputs[0].prev_index, 1);

    // Plain single-key inputs carry neither tag nor amount.
    let plain = &descriptor.trezor_inputs[3];
    assert_eq!(plain.address_n, vec![41, 1, 1]);
    assert_eq!(plain.prev_hash, TXID_4);
    assert_eq!(plain.prev_index, 0);
    assert!(plain.script_type.is_none());
    assert!(plain.amount.is_none());

    // The multisig input carries its redeem metadata.
    let multisig_input = &descriptor.trezor_inputs[4];
    assert_eq!(multisig_input.address_n, vec![42, 1, 1]);
    assert_eq!(multisig_input.script_type, Some(InputScriptType::SpendMultisig));
    assert!(multisig_input.amount.is_none());
    let redeem = multisig_input.multisig.as_ref().unwrap();
    assert_eq!(redeem.m, 2);
    assert_eq!(redeem.signatures, vec!["", "", ""]);
    assert_eq!(redeem.pubkeys.len(), 3);
    assert_eq!(
        redeem.pubkeys[0].node.chain_code,
        "a6d47170817f78094180f1a7a3a9df7634df75fa9604d71b87e92a5a6bf9d30a"
    );
    assert_eq!(
        redeem.pubkeys[0].node.public_key,
        "03142b0a6fa6943e7276ddc42582c6b169243d289ff17e7c8101797047eed90c9b"
    );

    // Outputs are classified by their structural shape.
    assert_eq!(descriptor.trezor_outputs.len(), 2);
    for (trezor_output, expected_amount) in
        descriptor.trezor_outputs.iter().zip(["750000000", "99990000"])
    {
        assert_eq!(trezor_output.script_type, OutputScriptType::PayToAddress);
        assert_eq!(trezor_output.amount, expected_amount);
    }

    // Previous transactions were resolved for every consumed input.
    let transactions = descriptor.transactions.unwrap();
    assert_eq!(transactions.len(), 5);
}

#[test]
fn resolves_previous_transactions_through_the_backend() {
    let backend = fixture_backend();
    builder_with(backend.clone()).build(&payment_request(7_5000_0000)).unwrap();

    assert_eq!(backend.transaction_call_count(), 1);
    let queried = backend.last_transactions_query.lock().unwrap().clone().unwrap();
    assert_eq!(queried, vec![TXID_1, TXID_2, TXID_3, TXID_4, TXID_MULTISIG]);
}

#[test]
fn trezor_connect_skips_previous_transactions() {
    let backend = fixture_backend();
    let mut request = payment_request(7_5000_0000);
    request.trezor_connect = true;

    let outcome = builder_with(backend.clone()).build(&request).unwrap();
    assert!(outcome.is_valid());
    assert!(outcome.as_descriptor().unwrap().transactions.is_none());
    assert_eq!(backend.transaction_call_count(), 0);
}

#[test]
fn uses_supplied_inputs_and_transactions_without_backend_queries() {
    let backend = Arc::new(RecordingBackend::default());
    let mut request = payment_request(1_0000_0000);
    request.inputs = Some(fixture_utxos());
    request.transactions = Some(prev_transactions_for(&[TXID_1]));

    let outcome = builder_with(backend.clone()).build(&request).unwrap();
    assert!(outcome.is_valid());
    assert_eq!(backend.unspent_call_count(), 0);
    assert_eq!(backend.transaction_call_count(), 0);
    assert_eq!(outcome.as_descriptor().unwrap().transactions.unwrap().len(), 1);
}

#[test]
fn fails_without_derivation_metadata() {
    let backend = fixture_backend();
    let request = TrezorRequest {
        outputs: vec![Output::new(PAYMENT_ADDRESS, 1_0000_0000)],
        ..TrezorRequest::default()
    };

    let outcome = builder_with(backend).build(&request).unwrap();
    assert!(!outcome.is_valid());
    assert_eq!(outcome.errors(), &[DraftError::NoBip32AddressesGiven]);
    assert!(outcome.as_descriptor().is_none());
}

#[test]
fn draft_level_failures_carry_through() {
    let backend = fixture_backend();
    let outcome = builder_with(backend).build(&payment_request(70_0000_0000)).unwrap();

    assert_eq!(outcome.errors(), &[DraftError::InsufficientFunds]);
    assert!(outcome.as_descriptor().is_none());
}

#[test]
fn an_input_without_metadata_is_a_fatal_error() {
    // The backend reports a UTXO owned by an address nobody declared.
    let mut utxos = fixture_utxos();
    utxos.insert(0, Utxo::new("msomebodyelse", TXID_1, 9, 9_0000_0000, SCRIPT));
    let backend = Arc::new(RecordingBackend::with_unspent(utxos));

    let result = builder_with(backend).build(&payment_request(8_0000_0000));
    assert!(matches!(
        result,
        Err(CoindraftError::Signing(SigningError::UnknownAddress(_)))
    ));
}

#[test]
fn malformed_xpubs_are_a_fatal_error() {
    let backend = fixture_backend();
    let request = TrezorRequest {
        bip32_addresses: vec![Bip32Spec::Multisig {
            xpubs: vec!["garbage".to_string()],
            path: vec![1],
            threshold: 1,
        }],
        outputs: vec![Output::new(PAYMENT_ADDRESS, 1_0000_0000)],
        ..TrezorRequest::default()
    };

    let result = builder_with(backend).build(&request);
    assert!(matches!(
        result,
        Err(CoindraftError::Signing(SigningError::InvalidXpub(_)))
    ));
}
