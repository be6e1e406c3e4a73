//! Core types for transaction drafting
//!
//! This module defines the request shape the drafting engine consumes, the
//! symbolic validation codes an invalid draft carries, and the finished
//! [`TransactionDraft`].
//!
//! # Validity
//!
//! A [`Draft`] is either valid — every invariant held and
//! [`Draft::as_draft`] yields the full result — or invalid, in which case
//! it carries a non-empty ordered list of [`DraftError`] codes and exposes
//! no draft fields. Validation problems are data, not `Err` values;
//! transport failures use the crate error channel instead.

use serde::{Deserialize, Serialize};

use crate::types::{OutPointRef, Output, Utxo};

/// Validation codes carried by an invalid draft, in the order they were
/// detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftError {
    /// No source addresses were supplied
    NoAddressesGiven,
    /// No outputs were requested and spend-all was not set
    TryWithSpendAll,
    /// A requested output is below the dust threshold
    DustInOutputs,
    /// Selected inputs cannot cover the outputs plus the fee
    InsufficientFunds,
    /// The signing-descriptor path was invoked without derivation metadata
    NoBip32AddressesGiven,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            DraftError::NoAddressesGiven => "no_addresses_given",
            DraftError::TryWithSpendAll => "try_with_spend_all",
            DraftError::DustInOutputs => "dust_in_outputs",
            DraftError::InsufficientFunds => "insufficient_funds",
            DraftError::NoBip32AddressesGiven => "no_bip32_addresses_given",
        };
        write!(f, "{}", code)
    }
}

/// Configuration for one drafting call
///
/// Unrecognized fields are rejected at deserialization time rather than
/// silently ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DraftRequest {
    /// Source addresses to draw funds from (required, non-empty)
    pub addresses: Vec<String>,
    /// Requested payment outputs; may be empty only with `spend_all`
    pub outputs: Vec<Output>,
    /// Consume every available UTXO instead of selecting up to a target
    pub spend_all: bool,
    /// Where leftover value goes; defaults to the first source address
    pub change_address: Option<String>,
    /// Fee rate override in satoshis per kilobyte
    pub fee_per_kb: Option<u64>,
    /// Outputs that must not be consumed by this draft
    pub utxo_blacklist: Vec<OutPointRef>,
    /// Pre-fetched UTXOs; when present the backend is never queried
    pub inputs: Option<Vec<Utxo>>,
}

impl DraftRequest {
    /// Convenience constructor for the common addresses + outputs case.
    pub fn payment(addresses: Vec<String>, outputs: Vec<Output>) -> Self {
        Self {
            addresses,
            outputs,
            ..Self::default()
        }
    }
}

/// The finished, validated draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Sum of all consumed input amounts, in satoshis
    pub input_total: u64,
    /// Sum of all output amounts, in satoshis
    pub output_total: u64,
    /// `input_total - output_total`
    pub fee: u64,
    /// Consumed UTXOs, in selection order
    pub inputs: Vec<Utxo>,
    /// Payment outputs in request order, then the change output if any
    pub outputs: Vec<Output>,
    /// `(txid, vout)` pairs for every consumed input, ready to be
    /// blacklisted on a follow-up call
    pub utxos_to_blacklist: Vec<OutPointRef>,
}

/// Outcome of a drafting call: a valid draft or an ordered error list
#[derive(Debug, Clone)]
pub struct Draft {
    errors: Vec<DraftError>,
    inputs: Vec<Utxo>,
    outputs: Vec<Output>,
}

impl Draft {
    pub(crate) fn invalid(errors: Vec<DraftError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self {
            errors,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        errors: Vec<DraftError>,
        inputs: Vec<Utxo>,
        outputs: Vec<Output>,
    ) -> Self {
        Self {
            errors,
            inputs,
            outputs,
        }
    }

    /// Whether every validation invariant held
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Validation codes, in detection order; empty for a valid draft
    pub fn errors(&self) -> &[DraftError] {
        &self.errors
    }

    pub(crate) fn inputs(&self) -> &[Utxo] {
        &self.inputs
    }

    pub(crate) fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The full draft, or `None` when invalid
    ///
    /// Pure accessor: repeated calls return identical values and perform no
    /// backend work.
    pub fn as_draft(&self) -> Option<TransactionDraft> {
        if !self.is_valid() {
            return None;
        }
        let input_total: u64 = self.inputs.iter().map(|utxo| utxo.amount).sum();
        let output_total: u64 = self.outputs.iter().map(|output| output.amount).sum();
        Some(TransactionDraft {
            input_total,
            output_total,
            fee: input_total - output_total,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            utxos_to_blacklist: self.inputs.iter().map(Utxo::outpoint).collect(),
        })
    }
}
