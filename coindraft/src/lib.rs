//! Coindraft
//!
//! Builds spendable transactions for Bitcoin-style UTXO ledgers from a set
//! of source addresses and desired payments: discovers unspent outputs
//! through interchangeable chain data backends, selects enough of them to
//! cover the payments plus a dynamically computed network fee, appends a
//! change output when worthwhile, and optionally renders the result as a
//! hardware-signing-device descriptor.
//!
//! # Modules
//!
//! - `types`: Core domain records shared by every component
//! - `backend`: The normalized data-provider contract and its combinators
//!   (height-arbitrated selection, cash-address translation)
//! - `builder`: Coin selection, fee sizing and change computation
//! - `signing`: Hardware-signing descriptor construction
//! - `cashaddr`: Cash-address/legacy address codec
//! - `fees`: Fee schedule and the growing minimum-fee accumulator
//! - `config`: Dependency-injected builder configuration
//! - `logging`: Logging configuration and identifier sanitization
//! - `error`: Crate-level fatal error type
//!
//! # Security considerations
//!
//! This crate never signs transactions, never touches private keys, and
//! never broadcasts beyond delegating a single push call to the configured
//! backend. An invalid draft produces no result object and causes no side
//! effect.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use coindraft::{Config, DraftBuilder, DraftRequest, Output};
//! # fn backend() -> Arc<dyn coindraft::ChainBackend> { unimplemented!() }
//!
//! let config = Config::new(backend());
//! let engine = DraftBuilder::new(config);
//! let request = DraftRequest::payment(
//!     vec!["2NAHscN6XVqUPzBSJHC3fhkeF5SQVxiR9p9".into()],
//!     vec![Output::new("2BLEscN6XVqUPzBSJHC3fhkeF5SQVxiR9p9", 1_0000_0000)],
//! );
//! let outcome = engine.build(&request)?;
//! match outcome.as_draft() {
//!     Some(draft) => println!("fee: {} sats over {} inputs", draft.fee, draft.inputs.len()),
//!     None => println!("invalid: {:?}", outcome.errors()),
//! }
//! # Ok::<(), coindraft::CoindraftError>(())
//! ```

/// Core domain types
pub mod types;

/// Crate-level error handling
pub mod error;

/// Logging configuration and sanitization helpers
pub mod logging;

/// Cash-address/legacy address codec
pub mod cashaddr;

/// Fee schedule and minimum-fee accumulation
pub mod fees;

/// Chain data backend contract and combinators
pub mod backend;

/// Builder configuration
pub mod config;

/// Transaction drafting engine
pub mod builder;

/// Hardware-signing descriptor construction
pub mod signing;

/// Re-export the contract and combinators
pub use backend::{BackendError, CashAddressBackend, ChainBackend, FreshestBackend, PushOptions};

/// Re-export drafting types for convenience
pub use builder::{Draft, DraftBuilder, DraftError, DraftRequest, TransactionDraft};

/// Re-export signing-descriptor types for convenience
pub use signing::{
    Bip32Spec, InputScriptType, MultisigPubkey, MultisigRedeem, OutputScriptType, SigningError,
    SigningOutcome, TrezorDraft, TrezorDraftBuilder, TrezorInput, TrezorOutput, TrezorRequest,
    XpubNode,
};

/// Re-export common types
pub use config::Config;
pub use error::{CoindraftError, Result};
pub use fees::FeeSchedule;
pub use types::{
    AddressBalance, ChainVariant, IncomingPayment, OutPointRef, Output, PrevInput, PrevOutput,
    PrevTransaction, Utxo, DUST_THRESHOLD, SATS_PER_BTC,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization
///
/// Sets up logging with the default configuration. Safe to call multiple
/// times.
pub fn init() -> std::result::Result<(), String> {
    logging::init(&logging::LogConfig::default())
}
