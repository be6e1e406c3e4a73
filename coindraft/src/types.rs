//! Common data types for the coindraft transaction drafting core
//!
//! These types represent the records exchanged between data backends, the
//! coin selection engine and the signing-descriptor builder. They are
//! designed to be serializable and to NOT contain any private key material.
//!
//! # Identifier handling
//!
//! Addresses and transaction ids are carried as opaque strings. Backends are
//! the source of truth for their format; this core only classifies address
//! shapes and matches `(txid, vout)` pairs, it never re-encodes or parses
//! identifiers on its own.

use serde::{Deserialize, Serialize};

// Constants for Bitcoin-specific values

/// Constant for dust threshold (minimum output value, in satoshis)
pub const DUST_THRESHOLD: u64 = 546;

/// Constant for satoshis per Bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Chain variant a builder is configured for.
///
/// `BitcoinCash` selects the BIP143-style signing rules: every input
/// carries its spent amount and addresses derived from multisig key
/// material are rendered in cash-address form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainVariant {
    /// Bitcoin and Bitcoin-testnet style chains
    Bitcoin,
    /// Bitcoin Cash style chains (BIP143 signatures, cash-address text form)
    BitcoinCash,
}

/// Unspent transaction output as reported by a data backend
///
/// Identity is the `(txid, vout)` pair; it is what blacklists match on and
/// what ends up in a draft's list of consumed inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Address owning this output
    pub address: String,
    /// Transaction that created this output
    pub txid: String,
    /// Position of this output within that transaction
    pub vout: u32,
    /// Amount in satoshis
    pub amount: u64,
    /// Locking script, hex encoded
    pub script_pubkey: String,
}

impl Utxo {
    pub fn new(
        address: impl Into<String>,
        txid: impl Into<String>,
        vout: u32,
        amount: u64,
        script_pubkey: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            txid: txid.into(),
            vout,
            amount,
            script_pubkey: script_pubkey.into(),
        }
    }

    /// The `(txid, vout)` pair identifying this output
    pub fn outpoint(&self) -> OutPointRef {
        OutPointRef {
            txid: self.txid.clone(),
            vout: self.vout,
        }
    }
}

/// Reference to a transaction output by `(txid, vout)`
///
/// Used for UTXO blacklists and for the blacklist-ready list a finished
/// draft hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPointRef {
    pub txid: String,
    pub vout: u32,
}

impl OutPointRef {
    pub fn new(txid: impl Into<String>, vout: u32) -> Self {
        Self {
            txid: txid.into(),
            vout,
        }
    }
}

/// A payment destination and amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Destination address
    pub address: String,
    /// Amount in satoshis
    pub amount: u64,
}

impl Output {
    pub fn new(address: impl Into<String>, amount: u64) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

/// A payment received by one of the queried addresses
///
/// Unconfirmed payments carry `confirmations: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingPayment {
    /// Amount received, in satoshis
    pub amount: u64,
    /// Receiving address
    pub address: String,
    /// Transaction that paid the address
    pub txid: String,
    /// Confirmation count, `None` while unconfirmed
    pub confirmations: Option<u32>,
    /// Output position, to disambiguate when an address was paid more than
    /// once in the same transaction
    pub vout: u32,
    /// Comma separated list of input addresses, used to identify deposits
    /// from known parties
    pub sender_addresses: String,
}

/// Received/sent/balance totals for a single address
///
/// Confirmed figures only count transactions with the requested number of
/// confirmations; appearing in a block is not enough.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBalance {
    pub received: u64,
    pub sent: u64,
    pub total: u64,
    pub unconfirmed_received: u64,
    pub unconfirmed_sent: u64,
    pub unconfirmed_total: u64,
}

/// Full data for a previously confirmed transaction
///
/// This is the shape signing devices need to verify the amounts of the
/// inputs they are asked to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevTransaction {
    /// Transaction id
    pub hash: String,
    pub version: u32,
    pub lock_time: u32,
    pub inputs: Vec<PrevInput>,
    /// Outputs with their raw locking scripts
    pub bin_outputs: Vec<PrevOutput>,
}

/// One input of a previous transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevInput {
    pub prev_hash: String,
    pub prev_index: u32,
    pub sequence: u32,
    /// Unlocking script, hex encoded
    pub script_sig: String,
}

/// One output of a previous transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevOutput {
    /// Amount in satoshis
    pub amount: u64,
    /// Locking script, hex encoded
    pub script_pubkey: String,
}
