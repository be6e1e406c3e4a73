//! Builder configuration
//!
//! All collaborators are injected through [`Config`] rather than read from
//! shared global state: a config names the chain data backend, the fee
//! schedule, the network used when rendering derived addresses, and the
//! chain variant. Narrower overrides win — a per-call backend passed to a
//! builder takes precedence over the configured one, and a request-level
//! fee rate overrides the schedule default.

use std::sync::Arc;

use bitcoin::Network;

use crate::backend::ChainBackend;
use crate::fees::FeeSchedule;
use crate::types::ChainVariant;

/// Shared configuration for drafting and signing-descriptor builders
#[derive(Clone)]
pub struct Config {
    /// Chain data backend servicing queries
    pub backend: Arc<dyn ChainBackend>,
    /// Byte weights and rate defaults for fee computation
    pub fee: FeeSchedule,
    /// Network used when deriving addresses from key material
    pub network: Network,
    /// Chain variant governing signing-descriptor rules
    pub variant: ChainVariant,
}

impl Config {
    /// Create a configuration with default fee schedule, Bitcoin mainnet
    /// and the Bitcoin variant.
    pub fn new(backend: Arc<dyn ChainBackend>) -> Self {
        Self {
            backend,
            fee: FeeSchedule::default(),
            network: Network::Bitcoin,
            variant: ChainVariant::Bitcoin,
        }
    }

    pub fn with_fee(mut self, fee: FeeSchedule) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_variant(mut self, variant: ChainVariant) -> Self {
        self.variant = variant;
        self
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("fee", &self.fee)
            .field("network", &self.network)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
