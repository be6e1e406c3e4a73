//! Transaction drafting
//!
//! This module turns source addresses and requested payments into a
//! validated transaction draft: deterministic greedy coin selection,
//! iterative fee sizing, change computation and final amount validation.
//!
//! # Key types
//!
//! - [`DraftBuilder`]: the engine; one [`build`](DraftBuilder::build) call
//!   per draft.
//! - [`DraftRequest`]: the recognized configuration for a call.
//! - [`Draft`]: the outcome — valid with a [`TransactionDraft`] behind it,
//!   or invalid with an ordered list of [`DraftError`] codes.

pub mod engine;
pub mod types;

pub use engine::DraftBuilder;
pub use types::{Draft, DraftError, DraftRequest, TransactionDraft};
