//! Height-arbitrated backend selection
//!
//! [`FreshestBackend`] owns a fixed, ordered list of backends and routes
//! every call to whichever one currently reports the highest chain height.
//! Two things keep the arbitration cheap and stable:
//!
//! - decisions are memoized for a freshness window (10 minutes by default),
//!   so height is not re-polled on every call;
//! - the incumbent keeps the pin unless a challenger leads by strictly more
//!   than one block — a one-block lead is indistinguishable from re-org or
//!   propagation noise.
//!
//! The selector implements [`ChainBackend`] itself and forwards calls
//! verbatim, so it can stand anywhere a plain backend can — including
//! inside another selector. A forwarded call failing is not retried against
//! a different backend here; failures propagate unchanged, except the
//! provider-specific "no spendable outputs" signal which is normalized to
//! an empty list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::debug;

use crate::backend::{BackendError, ChainBackend, PushOptions};
use crate::types::{AddressBalance, IncomingPayment, PrevTransaction, Utxo};

/// How long a pin decision stays valid before heights are re-polled
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Minimum number of blocks a challenger must lead by to take the pin
const SWITCH_LEAD: u64 = 1;

struct PinState {
    pinned: usize,
    last_choice_at: Option<Instant>,
}

/// Backend selector that favors the most up-to-date of a fixed set
pub struct FreshestBackend {
    backends: Vec<Arc<dyn ChainBackend>>,
    window: Duration,
    state: Mutex<PinState>,
}

impl FreshestBackend {
    /// Create a selector over `backends`. The list must be non-empty; its
    /// first entry is the initial pin.
    pub fn new(backends: Vec<Arc<dyn ChainBackend>>) -> Self {
        Self::with_window(backends, DEFAULT_FRESHNESS_WINDOW)
    }

    /// Create a selector with a custom freshness window.
    pub fn with_window(backends: Vec<Arc<dyn ChainBackend>>, window: Duration) -> Self {
        assert!(!backends.is_empty(), "FreshestBackend needs at least one backend");
        Self {
            backends,
            window,
            state: Mutex::new(PinState {
                pinned: 0,
                last_choice_at: None,
            }),
        }
    }

    /// The backend servicing calls right now.
    ///
    /// Returns the pinned backend unchanged while the last decision is
    /// younger than the freshness window. Otherwise polls every
    /// challenger's height plus the incumbent's, records the decision time
    /// whether or not the pin moves, and re-pins only on a lead greater
    /// than [`SWITCH_LEAD`] blocks. Height-poll failures propagate.
    pub fn select(&self) -> Result<Arc<dyn ChainBackend>, BackendError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(at) = state.last_choice_at {
            if at.elapsed() < self.window {
                return Ok(self.backends[state.pinned].clone());
            }
        }
        state.last_choice_at = Some(Instant::now());

        let mut challenger: Option<(usize, u64)> = None;
        for (index, backend) in self.backends.iter().enumerate() {
            if index == state.pinned {
                continue;
            }
            let height = backend.block_height()?;
            if challenger.map_or(true, |(_, best)| height >= best) {
                challenger = Some((index, height));
            }
        }

        if let Some((index, height)) = challenger {
            let incumbent = self.backends[state.pinned].block_height()?;
            if height > incumbent + SWITCH_LEAD {
                debug!(
                    "switching chain backend: challenger #{} at height {} vs incumbent at {}",
                    index, height, incumbent
                );
                state.pinned = index;
            }
        }

        Ok(self.backends[state.pinned].clone())
    }

    #[cfg(test)]
    fn age_last_decision(&self, by: Duration) {
        let mut state = self.state.lock().unwrap();
        if let Some(at) = state.last_choice_at {
            state.last_choice_at = at.checked_sub(by);
        }
    }

    #[cfg(test)]
    fn pinned_index(&self) -> usize {
        self.state.lock().unwrap().pinned
    }
}

impl ChainBackend for FreshestBackend {
    fn incoming_for(
        &self,
        addresses: &[String],
        min_date: DateTime<Utc>,
    ) -> Result<Vec<IncomingPayment>, BackendError> {
        self.select()?.incoming_for(addresses, min_date)
    }

    fn balances_for(
        &self,
        addresses: &[String],
        confirmations: u32,
    ) -> Result<HashMap<String, AddressBalance>, BackendError> {
        self.select()?.balances_for(addresses, confirmations)
    }

    fn list_unspent(&self, addresses: &[String]) -> Result<Vec<Utxo>, BackendError> {
        match self.select()?.list_unspent(addresses) {
            Err(BackendError::NoFreeOutputs) => Ok(Vec::new()),
            other => other,
        }
    }

    fn list_transactions(&self, txids: &[String]) -> Result<Vec<PrevTransaction>, BackendError> {
        self.select()?.list_transactions(txids)
    }

    fn pushtx(&self, hex: &str, options: &PushOptions) -> Result<String, BackendError> {
        self.select()?.pushtx(hex, options)
    }

    fn block_height(&self) -> Result<u64, BackendError> {
        self.select()?.block_height()
    }

    fn verify_signatures(&self, hex: &str, options: &PushOptions) -> Result<(), BackendError> {
        self.select()?.verify_signatures(hex, options)
    }
}
