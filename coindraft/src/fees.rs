//! Fee schedule and the incrementally-growing minimum fee
//!
//! Fees are priced per kilobyte of estimated transaction size, with
//! separate byte weights for the fixed transaction overhead, each input and
//! each output. The engine does not know the final size up front: the
//! minimum fee starts at the overhead cost and grows by one increment per
//! output and per selected input, so the selection target moves as coins
//! are added.
//!
//! Accumulation uses decimal satoshis so odd fee rates never lose
//! precision mid-computation; amounts handed back to the caller are whole
//! satoshis.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Byte weights and rate defaults used to price a transaction draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fixed per-transaction overhead, in bytes
    pub overhead_size: u64,
    /// Estimated size of one input, in bytes
    pub input_size: u64,
    /// Estimated size of one output, in bytes
    pub output_size: u64,
    /// Rate applied when the caller does not supply one, in satoshis per
    /// kilobyte
    pub default_fee_per_kb: u64,
    /// Hard floor no computed fee may fall below, in satoshis
    pub network_minimum_fee: u64,
    /// Outputs below this amount are considered dust, in satoshis
    pub dust_threshold: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            overhead_size: 10,
            input_size: 35,
            output_size: 149,
            default_fee_per_kb: 10_000,
            network_minimum_fee: 10_000,
            dust_threshold: crate::types::DUST_THRESHOLD,
        }
    }
}

/// Running minimum-fee accumulator for one draft
///
/// Starts at the fixed-overhead cost; callers add one output increment per
/// requested output and one input increment per selected input. The
/// effective minimum is clamped to the network floor.
#[derive(Debug, Clone)]
pub struct FeeMeter {
    schedule: FeeSchedule,
    fee_per_kb: u64,
    accumulated: Decimal,
}

impl FeeMeter {
    /// Create a meter priced at `fee_per_kb` (falling back to the
    /// schedule's default), seeded with the fixed overhead cost.
    pub fn new(schedule: &FeeSchedule, fee_per_kb: Option<u64>) -> Self {
        let fee_per_kb = fee_per_kb.unwrap_or(schedule.default_fee_per_kb);
        let mut meter = Self {
            schedule: schedule.clone(),
            fee_per_kb,
            accumulated: Decimal::ZERO,
        };
        meter.accumulated = meter.fee_for_bytes(meter.schedule.overhead_size);
        meter
    }

    /// Price `bytes` at the configured per-kilobyte rate
    pub fn fee_for_bytes(&self, bytes: u64) -> Decimal {
        Decimal::from(bytes) / Decimal::from(1000u32) * Decimal::from(self.fee_per_kb)
    }

    /// Add the cost of `count` additional inputs
    pub fn add_input_fee(&mut self, count: usize) {
        self.accumulated +=
            self.fee_for_bytes(self.schedule.input_size) * Decimal::from(count as u64);
    }

    /// Add the cost of `count` additional outputs
    pub fn add_output_fee(&mut self, count: usize) {
        self.accumulated +=
            self.fee_for_bytes(self.schedule.output_size) * Decimal::from(count as u64);
    }

    /// Current effective minimum fee, with `stage` priced on top before the
    /// network floor is applied.
    ///
    /// `stage` lets a caller ask "what would the minimum be if the draft
    /// grew by this much" without committing the growth.
    pub fn minimum_fee(&self, stage: Decimal) -> Decimal {
        (self.accumulated + stage).max(Decimal::from(self.schedule.network_minimum_fee))
    }

    /// Effective minimum fee as whole satoshis, rounded up
    pub fn minimum_fee_sats(&self) -> u64 {
        self.minimum_fee(Decimal::ZERO)
            .ceil()
            .to_u64()
            .unwrap_or(u64::MAX)
    }

    /// The dust threshold this meter's schedule applies
    pub fn dust_threshold(&self) -> u64 {
        self.schedule.dust_threshold
    }

    /// Cost of one more output at the configured rate
    pub fn output_stage(&self) -> Decimal {
        self.fee_for_bytes(self.schedule.output_size)
    }
}
