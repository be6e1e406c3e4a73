//! Types for hardware-signing descriptors
//!
//! The structures here mirror what Trezor-class devices expect over the
//! wire: per-input derivation paths and script-type tags, per-output
//! classifications, and multisig redeem metadata with one signature slot
//! per participant. Serialized field names and tag spellings follow the
//! device protocol.

use serde::{Deserialize, Serialize};

use crate::types::{OutPointRef, Output, PrevTransaction, Utxo};

/// Derivation metadata for one source address
///
/// Either a plain address with its BIP32 path, or an M-of-N construction
/// described by its participant xpubs, the shared path and the signature
/// threshold. For multisig entries the effective address is derived from
/// the key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bip32Spec {
    /// A single-key address and its derivation path
    Single { address: String, path: Vec<u32> },
    /// An M-of-N script-hash construction
    Multisig {
        xpubs: Vec<String>,
        path: Vec<u32>,
        threshold: u32,
    },
}

/// Configuration for one signing-descriptor build
///
/// Unrecognized fields are rejected at deserialization time rather than
/// silently ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TrezorRequest {
    /// Derivation metadata; the effective source addresses derive from it
    pub bip32_addresses: Vec<Bip32Spec>,
    /// Requested payment outputs; may be empty only with `spend_all`
    pub outputs: Vec<Output>,
    /// Consume every available UTXO instead of selecting up to a target
    pub spend_all: bool,
    /// Where leftover value goes; defaults to the first derived address
    pub change_address: Option<String>,
    /// Fee rate override in satoshis per kilobyte
    pub fee_per_kb: Option<u64>,
    /// Outputs that must not be consumed by this draft
    pub utxo_blacklist: Vec<OutPointRef>,
    /// Pre-fetched UTXOs; when present the backend is not queried for them
    pub inputs: Option<Vec<Utxo>>,
    /// Pre-fetched previous transactions for the consumed inputs
    pub transactions: Option<Vec<PrevTransaction>>,
    /// Device-direct-connect mode: skip previous-transaction resolution
    pub trezor_connect: bool,
}

/// How a device must spend an input
///
/// Absence of a tag means a plain single-key spend, which is the device
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputScriptType {
    #[serde(rename = "SPENDMULTISIG")]
    SpendMultisig,
    #[serde(rename = "SPENDP2SHWITNESS")]
    SpendP2shWitness,
    #[serde(rename = "SPENDWITNESS")]
    SpendWitness,
}

/// How a device must encode an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputScriptType {
    #[serde(rename = "PAYTOADDRESS")]
    PayToAddress,
    #[serde(rename = "PAYTOSCRIPTHASH")]
    PayToScriptHash,
}

/// Root node of a participant's extended public key
///
/// Depth, child number and fingerprint are fixed at zero: the device
/// re-derives along `address_n` from the root node it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpubNode {
    /// Chain code, hex encoded
    pub chain_code: String,
    pub depth: u8,
    pub child_num: u32,
    pub fingerprint: u32,
    /// Compressed public key, hex encoded
    pub public_key: String,
}

/// One participant of a multisig construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigPubkey {
    /// Derivation path shared by the construction
    pub address_n: Vec<u32>,
    pub node: XpubNode,
}

/// Redeem metadata for an M-of-N input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigRedeem {
    /// One empty slot per participant, filled by the device as it signs
    pub signatures: Vec<String>,
    /// Required signature count
    pub m: u32,
    /// Participants, in construction order
    pub pubkeys: Vec<MultisigPubkey>,
}

/// Per-input signing instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrezorInput {
    /// BIP32 path of the key that must sign
    pub address_n: Vec<u32>,
    /// Transaction that created the consumed output
    pub prev_hash: String,
    /// Output position within that transaction
    pub prev_index: u32,
    /// Spent amount as a decimal string; required by BIP143-style schemes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_type: Option<InputScriptType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multisig: Option<MultisigRedeem>,
}

/// Per-output instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrezorOutput {
    pub script_type: OutputScriptType,
    pub address: String,
    /// Amount as a decimal string, the device's expected formatting for
    /// satoshi-scale integers
    pub amount: String,
}

/// The finished signing descriptor: the validated draft plus everything a
/// device needs to sign it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrezorDraft {
    pub input_total: u64,
    pub output_total: u64,
    pub fee: u64,
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<Output>,
    pub utxos_to_blacklist: Vec<OutPointRef>,
    pub trezor_inputs: Vec<TrezorInput>,
    pub trezor_outputs: Vec<TrezorOutput>,
    /// Previous transactions for the consumed inputs; `None` in
    /// device-direct-connect mode
    pub transactions: Option<Vec<PrevTransaction>>,
}
