//! Signing-descriptor construction
//!
//! [`TrezorDraftBuilder`] drafts a transaction exactly like
//! [`DraftBuilder`](crate::builder::DraftBuilder) and then maps the result
//! into per-input signing instructions: the derivation path of the key
//! that must sign, the script-type tag governing how, multisig redeem
//! metadata where the owning address was declared as an M-of-N
//! construction, and — unless the device can fetch them itself — the full
//! previous transaction for every consumed input.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::backend::ChainBackend;
use crate::builder::types::{Draft, DraftError, DraftRequest};
use crate::builder::DraftBuilder;
use crate::cashaddr;
use crate::config::Config;
use crate::error::Result;
use crate::signing::multisig;
use crate::signing::types::{
    Bip32Spec, InputScriptType, MultisigRedeem, OutputScriptType, TrezorDraft, TrezorInput,
    TrezorOutput, TrezorRequest,
};
use crate::signing::SigningError;
use crate::types::{ChainVariant, Output, PrevTransaction, Utxo};

/// Derivation metadata resolved for one effective source address
struct ResolvedBip32 {
    path: Vec<u32>,
    multisig: Option<MultisigRedeem>,
}

/// Outcome of a signing-descriptor build
///
/// Valid only when the underlying draft is valid; an invalid outcome
/// carries the draft's error codes and exposes no descriptor fields.
#[derive(Debug, Clone)]
pub struct SigningOutcome {
    draft: Draft,
    trezor_inputs: Vec<TrezorInput>,
    trezor_outputs: Vec<TrezorOutput>,
    transactions: Option<Vec<PrevTransaction>>,
}

impl SigningOutcome {
    fn invalid(errors: Vec<DraftError>) -> Self {
        Self {
            draft: Draft::invalid(errors),
            trezor_inputs: Vec::new(),
            trezor_outputs: Vec::new(),
            transactions: None,
        }
    }

    /// Whether the underlying draft validated
    pub fn is_valid(&self) -> bool {
        self.draft.is_valid()
    }

    /// Validation codes, in detection order; empty when valid
    pub fn errors(&self) -> &[DraftError] {
        self.draft.errors()
    }

    /// The full descriptor, or `None` when invalid
    ///
    /// Pure accessor: repeated calls return identical values and perform
    /// no backend work.
    pub fn as_descriptor(&self) -> Option<TrezorDraft> {
        let draft = self.draft.as_draft()?;
        Some(TrezorDraft {
            input_total: draft.input_total,
            output_total: draft.output_total,
            fee: draft.fee,
            inputs: draft.inputs,
            outputs: draft.outputs,
            utxos_to_blacklist: draft.utxos_to_blacklist,
            trezor_inputs: self.trezor_inputs.clone(),
            trezor_outputs: self.trezor_outputs.clone(),
            transactions: self.transactions.clone(),
        })
    }
}

/// Builds hardware-signing descriptors on top of the drafting engine
pub struct TrezorDraftBuilder {
    config: Config,
    backend_override: Option<Arc<dyn ChainBackend>>,
}

impl TrezorDraftBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            backend_override: None,
        }
    }

    /// Use `backend` for this builder instead of the configured one.
    pub fn with_backend(mut self, backend: Arc<dyn ChainBackend>) -> Self {
        self.backend_override = Some(backend);
        self
    }

    fn backend(&self) -> &Arc<dyn ChainBackend> {
        self.backend_override.as_ref().unwrap_or(&self.config.backend)
    }

    /// Draft a transaction and render its signing descriptor.
    pub fn build(&self, request: &TrezorRequest) -> Result<SigningOutcome> {
        if request.bip32_addresses.is_empty() {
            return Ok(SigningOutcome::invalid(vec![
                DraftError::NoBip32AddressesGiven,
            ]));
        }

        let (addresses, lookup) = self.resolve_addresses(&request.bip32_addresses)?;

        let draft_request = DraftRequest {
            addresses,
            outputs: request.outputs.clone(),
            spend_all: request.spend_all,
            change_address: request.change_address.clone(),
            fee_per_kb: request.fee_per_kb,
            utxo_blacklist: request.utxo_blacklist.clone(),
            inputs: request.inputs.clone(),
        };

        let mut engine = DraftBuilder::new(self.config.clone());
        if let Some(backend) = &self.backend_override {
            engine = engine.with_backend(backend.clone());
        }
        let draft = engine.build(&draft_request)?;
        if !draft.is_valid() {
            return Ok(SigningOutcome {
                draft,
                trezor_inputs: Vec::new(),
                trezor_outputs: Vec::new(),
                transactions: None,
            });
        }

        let trezor_inputs = draft
            .inputs()
            .iter()
            .map(|utxo| self.descriptor_input(utxo, &lookup))
            .collect::<Result<Vec<_>>>()?;
        let trezor_outputs = draft
            .outputs()
            .iter()
            .map(|output| self.descriptor_output(output))
            .collect::<Result<Vec<_>>>()?;
        let transactions = self.resolve_transactions(request, &draft)?;

        debug!(
            "signing descriptor built: {} inputs, {} outputs, prev txs {}",
            trezor_inputs.len(),
            trezor_outputs.len(),
            transactions.as_ref().map_or(0, Vec::len)
        );

        Ok(SigningOutcome {
            draft,
            trezor_inputs,
            trezor_outputs,
            transactions,
        })
    }

    /// Map every declared entry to its effective address, preserving
    /// declaration order for the engine (the first entry doubles as the
    /// default change destination).
    fn resolve_addresses(
        &self,
        specs: &[Bip32Spec],
    ) -> Result<(Vec<String>, HashMap<String, ResolvedBip32>)> {
        let mut addresses = Vec::with_capacity(specs.len());
        let mut lookup = HashMap::with_capacity(specs.len());

        for spec in specs {
            let (address, resolved) = match spec {
                Bip32Spec::Single { address, path } => (
                    address.clone(),
                    ResolvedBip32 {
                        path: path.clone(),
                        multisig: None,
                    },
                ),
                Bip32Spec::Multisig {
                    xpubs,
                    path,
                    threshold,
                } => {
                    let legacy =
                        multisig::derive_address(xpubs, path, *threshold, self.config.network)?;
                    let address = match self.config.variant {
                        ChainVariant::Bitcoin => legacy,
                        ChainVariant::BitcoinCash => cashaddr::from_legacy(&legacy)?,
                    };
                    let redeem = multisig::redeem_descriptor(xpubs, path, *threshold)?;
                    (
                        address,
                        ResolvedBip32 {
                            path: path.clone(),
                            multisig: Some(redeem),
                        },
                    )
                }
            };
            addresses.push(address.clone());
            lookup.insert(address, resolved);
        }

        Ok((addresses, lookup))
    }

    fn descriptor_input(
        &self,
        utxo: &Utxo,
        lookup: &HashMap<String, ResolvedBip32>,
    ) -> Result<TrezorInput> {
        let resolved = lookup
            .get(&utxo.address)
            .ok_or_else(|| SigningError::UnknownAddress(utxo.address.clone()))?;

        let mut input = TrezorInput {
            address_n: resolved.path.clone(),
            prev_hash: utxo.txid.clone(),
            prev_index: utxo.vout,
            amount: None,
            script_type: None,
            multisig: None,
        };

        match self.config.variant {
            ChainVariant::Bitcoin => {
                if let Some(redeem) = &resolved.multisig {
                    input.script_type = Some(InputScriptType::SpendMultisig);
                    input.multisig = Some(redeem.clone());
                } else if utxo.address.starts_with('2') || utxo.address.starts_with('3') {
                    // Script-hash addresses are spent as nested segwit.
                    input.script_type = Some(InputScriptType::SpendP2shWitness);
                    input.amount = Some(utxo.amount.to_string());
                } else if utxo.address.starts_with("bc1") || utxo.address.starts_with("tb1") {
                    input.script_type = Some(InputScriptType::SpendWitness);
                    input.amount = Some(utxo.amount.to_string());
                }
            }
            ChainVariant::BitcoinCash => {
                // BIP143-style signatures always commit to the amount.
                input.amount = Some(utxo.amount.to_string());
                if let Some(redeem) = &resolved.multisig {
                    input.script_type = Some(InputScriptType::SpendMultisig);
                    input.multisig = Some(redeem.clone());
                }
            }
        }

        Ok(input)
    }

    fn descriptor_output(&self, output: &Output) -> Result<TrezorOutput> {
        let classified = match self.config.variant {
            ChainVariant::Bitcoin => output.address.clone(),
            ChainVariant::BitcoinCash => cashaddr::to_legacy_if_needed(&output.address)?,
        };
        let script_type = if classified.starts_with('1')
            || classified.starts_with('m')
            || classified.starts_with('n')
        {
            OutputScriptType::PayToAddress
        } else {
            OutputScriptType::PayToScriptHash
        };

        Ok(TrezorOutput {
            script_type,
            address: output.address.clone(),
            amount: output.amount.to_string(),
        })
    }

    fn resolve_transactions(
        &self,
        request: &TrezorRequest,
        draft: &Draft,
    ) -> Result<Option<Vec<PrevTransaction>>> {
        if request.trezor_connect {
            return Ok(None);
        }
        if let Some(transactions) = &request.transactions {
            return Ok(Some(transactions.clone()));
        }
        let txids: Vec<String> = draft.inputs().iter().map(|utxo| utxo.txid.clone()).collect();
        Ok(Some(self.backend().list_transactions(&txids)?))
    }
}
