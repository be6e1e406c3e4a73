//! Cash-address translation around any backend
//!
//! Most Bitcoin Cash node software still speaks legacy base58 addresses
//! while the rest of the system works in cash-address form.
//! [`CashAddressBackend`] bridges the two: request addresses are converted
//! to the wrapped backend's legacy encoding on the way down, and every
//! address the backend returns is converted back to cash-address form on
//! the way up.
//!
//! The translation applies to the operations that carry addresses in
//! requests or responses (unspent listing, balances, incoming payments).
//! Operations that carry none — raw transaction listing, height, broadcast,
//! signature verification — pass through untouched. Output identity is
//! never affected: both encodings name the same underlying hash.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backend::{BackendError, ChainBackend, PushOptions};
use crate::cashaddr;
use crate::types::{AddressBalance, IncomingPayment, PrevTransaction, Utxo};

/// Wrapper translating cash-address text to a backend's legacy encoding
pub struct CashAddressBackend {
    backend: Arc<dyn ChainBackend>,
}

impl CashAddressBackend {
    pub fn new(backend: Arc<dyn ChainBackend>) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &Arc<dyn ChainBackend> {
        &self.backend
    }

    fn to_legacy(addresses: &[String]) -> Result<Vec<String>, BackendError> {
        addresses
            .iter()
            .map(|address| cashaddr::to_legacy(address).map_err(BackendError::from))
            .collect()
    }
}

impl ChainBackend for CashAddressBackend {
    fn incoming_for(
        &self,
        addresses: &[String],
        min_date: DateTime<Utc>,
    ) -> Result<Vec<IncomingPayment>, BackendError> {
        let rows = self
            .backend
            .incoming_for(&Self::to_legacy(addresses)?, min_date)?;
        rows.into_iter()
            .map(|row| {
                let senders = row
                    .sender_addresses
                    .split(',')
                    .filter(|sender| !sender.is_empty())
                    .map(|sender| cashaddr::from_legacy(sender).map_err(BackendError::from))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(",");
                Ok(IncomingPayment {
                    address: cashaddr::from_legacy(&row.address)?,
                    sender_addresses: senders,
                    ..row
                })
            })
            .collect()
    }

    fn balances_for(
        &self,
        addresses: &[String],
        confirmations: u32,
    ) -> Result<HashMap<String, AddressBalance>, BackendError> {
        let balances = self
            .backend
            .balances_for(&Self::to_legacy(addresses)?, confirmations)?;
        balances
            .into_iter()
            .map(|(address, balance)| Ok((cashaddr::from_legacy(&address)?, balance)))
            .collect()
    }

    fn list_unspent(&self, addresses: &[String]) -> Result<Vec<Utxo>, BackendError> {
        let utxos = self.backend.list_unspent(&Self::to_legacy(addresses)?)?;
        utxos
            .into_iter()
            .map(|utxo| {
                Ok(Utxo {
                    address: cashaddr::from_legacy(&utxo.address)?,
                    ..utxo
                })
            })
            .collect()
    }

    fn list_transactions(&self, txids: &[String]) -> Result<Vec<PrevTransaction>, BackendError> {
        self.backend.list_transactions(txids)
    }

    fn pushtx(&self, hex: &str, options: &PushOptions) -> Result<String, BackendError> {
        self.backend.pushtx(hex, options)
    }

    fn block_height(&self) -> Result<u64, BackendError> {
        self.backend.block_height()
    }

    fn verify_signatures(&self, hex: &str, options: &PushOptions) -> Result<(), BackendError> {
        self.backend.verify_signatures(hex, options)
    }
}
