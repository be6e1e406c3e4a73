//! Data backend contract and backend combinators
//!
//! Every chain data provider — a full node RPC bridge, a block explorer
//! client, an indexer — is normalized behind the [`ChainBackend`] trait so
//! the drafting engine only ever sees one contract. The wire-level clients
//! themselves live outside this crate; what lives here are the combinators
//! that compose backends:
//!
//! - [`FreshestBackend`]: picks whichever configured backend reports the
//!   highest chain height, with a short memoization window and a bias
//!   toward the incumbent.
//! - [`CashAddressBackend`]: translates between cash-address and legacy
//!   address text around any other backend.
//!
//! Because the combinators implement [`ChainBackend`] themselves they nest
//! freely: a selector can arbitrate between wrapped backends, and a wrapper
//! can sit in front of a selector.

pub mod cash_wrapper;
pub mod freshest;

pub use cash_wrapper::CashAddressBackend;
pub use freshest::FreshestBackend;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cashaddr::CashAddrError;
use crate::types::{AddressBalance, IncomingPayment, PrevTransaction, Utxo};

/// Errors surfaced by chain data backends
///
/// These are transport-level failures; they are never folded into a draft's
/// validation codes and propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend connection error: {0}")]
    Connection(String),

    #[error("backend returned malformed data: {0}")]
    BadResponse(String),

    #[error("backend service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Provider-specific way of saying the queried addresses hold nothing
    /// spendable. [`FreshestBackend`] normalizes this to an empty list.
    #[error("no spendable outputs for the queried addresses")]
    NoFreeOutputs,

    /// A broadcast-time signature check failed. Fatal: the transaction must
    /// not be broadcast and the call is never retried.
    #[error("signature for input {0} is invalid")]
    InvalidSignature(usize),

    #[error("address encoding error: {0}")]
    Address(#[from] CashAddrError),
}

/// Options accepted by [`ChainBackend::pushtx`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PushOptions {
    /// Verify every input signature against its previous output's locking
    /// script before broadcasting; any invalid signature must abort the
    /// broadcast with [`BackendError::InvalidSignature`].
    pub verify_signatures: bool,
}

/// The contract every chain data provider must satisfy
///
/// All amounts are integer satoshis. Implementations must be shareable
/// across threads; the engine holds them behind `Arc<dyn ChainBackend>`.
pub trait ChainBackend: Send + Sync {
    /// List all payments received by `addresses` after `min_date`,
    /// confirmed and unconfirmed alike; unconfirmed entries carry a `None`
    /// confirmation count.
    fn incoming_for(
        &self,
        addresses: &[String],
        min_date: DateTime<Utc>,
    ) -> Result<Vec<IncomingPayment>, BackendError>;

    /// Received, sent and balance totals per address. Confirmed figures
    /// must have at least `confirmations` confirmations.
    fn balances_for(
        &self,
        addresses: &[String],
        confirmations: u32,
    ) -> Result<HashMap<String, AddressBalance>, BackendError>;

    /// Unspent outputs currently held by `addresses`, in the provider's
    /// own order. That order is what the drafting engine consumes.
    fn list_unspent(&self, addresses: &[String]) -> Result<Vec<Utxo>, BackendError>;

    /// Full transaction data for each of `txids`.
    fn list_transactions(&self, txids: &[String]) -> Result<Vec<PrevTransaction>, BackendError>;

    /// Broadcast a raw transaction, returning its id.
    ///
    /// When `options.verify_signatures` is set the provider must check
    /// every input signature first and fail without broadcasting if any is
    /// invalid.
    fn pushtx(&self, hex: &str, options: &PushOptions) -> Result<String, BackendError>;

    /// Current best block height.
    fn block_height(&self) -> Result<u64, BackendError>;

    /// Independently check every input signature of a raw transaction,
    /// resolving the referenced previous outputs via
    /// [`list_transactions`](Self::list_transactions).
    fn verify_signatures(&self, hex: &str, options: &PushOptions) -> Result<(), BackendError>;
}
