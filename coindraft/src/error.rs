//! Crate-level error handling
//!
//! Fatal failures — transport errors from backends, key-derivation or
//! address-codec problems — are surfaced through [`CoindraftError`].
//! Expected business conditions (an underfunded or dust-laden draft) are
//! NOT errors: they travel as the ordered code list on the draft outcome,
//! so callers can always distinguish "this request cannot be drafted" from
//! "something in the environment broke".

use thiserror::Error;

use crate::backend::BackendError;
use crate::cashaddr::CashAddrError;
use crate::signing::SigningError;

/// The error type for fatal coindraft failures
#[derive(Debug, Error)]
pub enum CoindraftError {
    /// A chain data backend failed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Key material for a signing descriptor could not be processed
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// An address could not be converted between encodings
    #[error("address encoding error: {0}")]
    Address(#[from] CashAddrError),
}

/// Type alias for a Result with [`CoindraftError`]
pub type Result<T> = std::result::Result<T, CoindraftError>;
