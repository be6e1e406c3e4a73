//! The transaction drafting engine
//!
//! [`DraftBuilder`] turns a [`DraftRequest`] into a validated [`Draft`]:
//! it resolves available UTXOs (from the backend, or from the request when
//! the caller already holds them), selects enough of them to cover the
//! requested payments plus a dynamically growing fee, appends a change
//! output when the residual is worth keeping, and validates the final
//! amounts.
//!
//! # Selection policy
//!
//! Selection is deterministic greedy in provider/caller order — the engine
//! walks UTXOs exactly as they were handed over and never re-sorts them by
//! amount. Predictability over optimality is deliberate: given the same
//! backend answer, two calls draft the same transaction. The accumulation
//! target moves while selecting, because every added input makes the
//! transaction larger and therefore more expensive.
//!
//! # Validity
//!
//! Business-rule violations (dust outputs, underfunded requests) make the
//! outcome invalid but are not `Err` values; only backend failures use the
//! error channel. An invalid outcome reports the first failing validation
//! class and nothing else — see [`Draft`].

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::json;

use crate::backend::ChainBackend;
use crate::builder::types::{Draft, DraftError, DraftRequest};
use crate::config::Config;
use crate::error::Result;
use crate::fees::FeeMeter;
use crate::logging::sanitize_for_logging;
use crate::types::{OutPointRef, Output, Utxo};

/// Coin selection and fee/change engine
pub struct DraftBuilder {
    config: Config,
    backend_override: Option<Arc<dyn ChainBackend>>,
}

impl DraftBuilder {
    /// Create an engine using the configured backend and fee schedule.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            backend_override: None,
        }
    }

    /// Use `backend` for this engine instead of the configured one.
    ///
    /// The narrower override wins; the configuration itself is untouched.
    pub fn with_backend(mut self, backend: Arc<dyn ChainBackend>) -> Self {
        self.backend_override = Some(backend);
        self
    }

    fn backend(&self) -> &Arc<dyn ChainBackend> {
        self.backend_override.as_ref().unwrap_or(&self.config.backend)
    }

    /// Draft a transaction for `request`.
    ///
    /// Returns `Err` only for backend failures. Every business-rule
    /// violation is reported through the outcome's error codes instead.
    pub fn build(&self, request: &DraftRequest) -> Result<Draft> {
        if request.addresses.is_empty() {
            return Ok(Draft::invalid(vec![DraftError::NoAddressesGiven]));
        }
        if request.outputs.is_empty() && !request.spend_all {
            return Ok(Draft::invalid(vec![DraftError::TryWithSpendAll]));
        }

        let mut errors = Vec::new();
        let mut meter = FeeMeter::new(&self.config.fee, request.fee_per_kb);
        meter.add_output_fee(request.outputs.len());

        if request
            .outputs
            .iter()
            .any(|output| output.amount < meter.dust_threshold())
        {
            errors.push(DraftError::DustInOutputs);
        }

        // Selection runs even when a dust output already spoiled the draft;
        // the outcome stays invalid either way.
        let available = self.available_utxos(request)?;
        let inputs = select_inputs(request, available, &mut meter);

        let mut outputs = request.outputs.clone();
        let input_total: u64 = inputs.iter().map(|utxo| utxo.amount).sum();
        add_change_output(request, &mut outputs, input_total, &mut meter);

        if errors.is_empty() {
            let output_total: u64 = outputs.iter().map(|output| output.amount).sum();
            if Decimal::from(input_total)
                < Decimal::from(output_total) + meter.minimum_fee(Decimal::ZERO)
            {
                warn!(
                    "draft underfunded: {} inputs worth {} cannot cover {} plus fee",
                    inputs.len(),
                    input_total,
                    output_total
                );
                errors.push(DraftError::InsufficientFunds);
            }
        }

        debug!(
            "draft built: {}",
            json!({
                "inputs": inputs.len(),
                "outputs": outputs.len(),
                "input_total": input_total,
                "errors": errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
                "first_address": request.addresses.first().map(|a| sanitize_for_logging(a)),
            })
        );

        Ok(Draft::from_parts(errors, inputs, outputs))
    }

    /// Resolve the spendable UTXO set, honoring the blacklist.
    ///
    /// Pre-supplied inputs bypass the backend entirely; callers that have
    /// already fetched and cached this data never trigger a query.
    fn available_utxos(&self, request: &DraftRequest) -> Result<Vec<Utxo>> {
        let all = match &request.inputs {
            Some(inputs) => inputs.clone(),
            None => self.backend().list_unspent(&request.addresses)?,
        };

        let blacklist: HashSet<OutPointRef> = request.utxo_blacklist.iter().cloned().collect();
        Ok(all
            .into_iter()
            .filter(|utxo| !blacklist.contains(&utxo.outpoint()))
            .collect())
    }
}

/// Walk `available` in order, accumulating inputs until the moving target
/// (requested amount plus the current minimum fee) is reached. With
/// `spend_all`, every available UTXO is consumed and priced in.
fn select_inputs(request: &DraftRequest, available: Vec<Utxo>, meter: &mut FeeMeter) -> Vec<Utxo> {
    if request.spend_all {
        meter.add_input_fee(available.len());
        return available;
    }

    let needed: u64 = request.outputs.iter().map(|output| output.amount).sum();
    let mut inputs = Vec::new();
    let mut collected = Decimal::ZERO;
    for utxo in available {
        if collected >= Decimal::from(needed) + meter.minimum_fee(Decimal::ZERO) {
            break;
        }
        collected += Decimal::from(utxo.amount);
        inputs.push(utxo);
        meter.add_input_fee(1);
    }
    inputs
}

/// Append a change output when the residual exceeds the dust threshold;
/// otherwise the residual is silently absorbed into the fee.
///
/// The residual is evaluated as if the change output already existed, so
/// its own fee cost can never turn the draft underfunded.
fn add_change_output(
    request: &DraftRequest,
    outputs: &mut Vec<Output>,
    input_total: u64,
    meter: &mut FeeMeter,
) {
    let output_total: u64 = outputs.iter().map(|output| output.amount).sum();
    let change = Decimal::from(input_total)
        - Decimal::from(output_total)
        - meter.minimum_fee(meter.output_stage());

    if change > Decimal::from(meter.dust_threshold()) {
        let change_address = request
            .change_address
            .clone()
            .unwrap_or_else(|| request.addresses[0].clone());
        // Fractional satoshis from odd fee rates are truncated into the fee.
        let amount = change.floor().to_u64().unwrap_or(0);
        outputs.push(Output::new(change_address, amount));
        meter.add_output_fee(1);
    }
}
