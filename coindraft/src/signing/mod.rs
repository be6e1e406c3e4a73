//! Hardware-signing descriptor construction
//!
//! Maps a validated transaction draft into the instructions a
//! Trezor-class signing device consumes: per-input derivation paths and
//! script-type tags, multisig redeem metadata, per-output classifications
//! and the previous transactions backing every consumed input.
//!
//! # Key types
//!
//! - [`TrezorDraftBuilder`]: drafts and renders in one call.
//! - [`TrezorRequest`]: derivation metadata plus the drafting options.
//! - [`SigningOutcome`] / [`TrezorDraft`]: the result pair — outcome with
//!   validity and error codes, descriptor with the device-ready fields.

pub mod builder;
pub mod multisig;
pub mod types;

pub use builder::{SigningOutcome, TrezorDraftBuilder};
pub use types::{
    Bip32Spec, InputScriptType, MultisigPubkey, MultisigRedeem, OutputScriptType, TrezorDraft,
    TrezorInput, TrezorOutput, TrezorRequest, XpubNode,
};

use thiserror::Error;

/// Fatal failures while processing signing key material
///
/// These are never folded into a draft's validation codes; a request that
/// cannot be keyed is a broken request, not an underfunded one.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid extended public key: {0}")]
    InvalidXpub(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("multisig script construction failed: {0}")]
    Script(String),

    #[error("no derivation metadata for address {0}")]
    UnknownAddress(String),
}
