//! Shared fixtures and the recording mock backend used across the
//! integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use coindraft::{
    AddressBalance, BackendError, ChainBackend, IncomingPayment, PrevInput, PrevOutput,
    PrevTransaction, PushOptions, Utxo,
};

pub const P2SH_ADDRESS: &str = "2NAHscN6XVqUPzBSJHC3fhkeF5SQVxiR9p9";
pub const P2PKH_ADDRESS: &str = "mnh1Roe5yQe473zZnJLoTjuyRp9L7tZuzj";
pub const PAYMENT_ADDRESS: &str = "mreXn2qhKo7tnLnA2xCnBUSc1rC3W76FHG";

pub const CASH_P2SH_ADDRESS: &str = "bchtest:pza05cp9mshq7xx5h8e95cwsgv9lv0dhgyux7cru05";
pub const CASH_P2PKH_ADDRESS: &str = "bchtest:qp82lfltxpfjmr02aqx93kmwe6a32qtkucp4e2cgyd";
pub const CASH_PAYMENT_ADDRESS: &str = "bchtest:qpaps04mxmjkv4xmhua7hmmww4999wlcl5sewjt0m0";

pub const TXID_1: &str = "956b30c3c4335f019dbee60c60d76994319473acac356f774c7858cd5c968e40";
pub const TXID_2: &str = "0ded7f014fa3213e9b000bc81b8151bc6f2f926b9afea6e3643c8ad658353c72";
pub const TXID_3: &str = "1db1f22beb84e5fbe92c8c5e6e7f43d80aa5cfe5d48d83513edd9641fc00d055";
pub const TXID_4: &str = "9gb1op2beb84e5fbe92c8c5e6e7f43d80aa5cfe5d48d83513edd9641fc00d055";
pub const TXID_MULTISIG: &str = "eeeb30c3c4335f019dbee60c60d76994319473acac356f774c7858cd5c968eee";

pub const SCRIPT: &str = "76a91420993489de25302418540f4b410c0c1d3e1d05a988ac";

pub const XPUBS: [&str; 3] = [
    "xpub661MyMwAqRbcGCmcnz4JtnieVyuvgQFGqZqw3KS1g9khndpF3segkAYbYCKKaQ9Di2ZuWLaZU4Axt7TrKq41aVYx8XTbDbQFzhhDMntKLU5",
    "xpub661MyMwAqRbcFwc3Nmz8WmMU9okGmeVSmuprwNHCVsfhy6vMyg6g79octqwNftK4g62TMWmb7UtVpnAWnANzqwtKrCDFe2UaDCv1HoErssE",
    "xpub661MyMwAqRbcGkqPSKVkwTMtFZzEpbWXjM4t1Dv1XQbfMxtyLRGupWkp3fcSCDtp6nd1AUrRtq8tnFGTYgkY1pB9muwzaBDnJSMo2rVENhz",
];

pub fn xpubs() -> Vec<String> {
    XPUBS.iter().map(|x| x.to_string()).collect()
}

/// Three 2 BTC outputs held by the P2SH address, in a fixed order.
pub fn p2sh_utxos() -> Vec<Utxo> {
    vec![
        Utxo::new(P2SH_ADDRESS, TXID_1, 1, 2_0000_0000, SCRIPT),
        Utxo::new(P2SH_ADDRESS, TXID_2, 1, 2_0000_0000, SCRIPT),
        Utxo::new(P2SH_ADDRESS, TXID_3, 1, 2_0000_0000, SCRIPT),
    ]
}

/// The P2SH outputs plus a 1.5 BTC single-key output.
pub fn mixed_utxos() -> Vec<Utxo> {
    let mut utxos = p2sh_utxos();
    utxos.push(Utxo::new(
        P2PKH_ADDRESS,
        TXID_4,
        0,
        1_5000_0000,
        "19ag1420993489de25302418540f4b410c0c1d3e1d05a988ac",
    ));
    utxos
}

pub fn prev_transaction(hash: &str) -> PrevTransaction {
    PrevTransaction {
        hash: hash.to_string(),
        version: 1,
        lock_time: 0,
        inputs: vec![PrevInput {
            prev_hash: "158d6bbe586b4e00347f992e8296532d69f902d0ead32d964b6c87d4f8f0d3ea"
                .to_string(),
            prev_index: 0,
            sequence: 0xffff_ffff,
            script_sig: "SCRIPTSCRIPTSCRIPT".to_string(),
        }],
        bin_outputs: vec![
            PrevOutput {
                amount: 4_814_421_497,
                script_pubkey: "5c7837366139".to_string(),
            },
            PrevOutput {
                amount: 681_715,
                script_pubkey: "5c7861393134".to_string(),
            },
        ],
    }
}

pub fn prev_transactions_for(txids: &[&str]) -> Vec<PrevTransaction> {
    txids.iter().map(|txid| prev_transaction(txid)).collect()
}

/// Backend double that serves canned data and records what it was asked.
#[derive(Default)]
pub struct RecordingBackend {
    pub unspent: Vec<Utxo>,
    pub transactions: Vec<PrevTransaction>,
    pub incoming: Vec<IncomingPayment>,
    pub balances: HashMap<String, AddressBalance>,
    pub height: u64,
    pub unspent_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,
    pub height_calls: AtomicUsize,
    pub last_unspent_query: Mutex<Option<Vec<String>>>,
    pub last_balances_query: Mutex<Option<Vec<String>>>,
    pub last_incoming_query: Mutex<Option<Vec<String>>>,
    pub last_transactions_query: Mutex<Option<Vec<String>>>,
    pub pushed: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn with_unspent(unspent: Vec<Utxo>) -> Self {
        Self {
            unspent,
            height: 100,
            ..Self::default()
        }
    }

    pub fn with_unspent_and_transactions(
        unspent: Vec<Utxo>,
        transactions: Vec<PrevTransaction>,
    ) -> Self {
        Self {
            unspent,
            transactions,
            height: 100,
            ..Self::default()
        }
    }

    pub fn unspent_call_count(&self) -> usize {
        self.unspent_calls.load(Ordering::SeqCst)
    }

    pub fn transaction_call_count(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }
}

impl ChainBackend for RecordingBackend {
    fn incoming_for(
        &self,
        addresses: &[String],
        _min_date: DateTime<Utc>,
    ) -> Result<Vec<IncomingPayment>, BackendError> {
        *self.last_incoming_query.lock().unwrap() = Some(addresses.to_vec());
        Ok(self.incoming.clone())
    }

    fn balances_for(
        &self,
        addresses: &[String],
        _confirmations: u32,
    ) -> Result<HashMap<String, AddressBalance>, BackendError> {
        *self.last_balances_query.lock().unwrap() = Some(addresses.to_vec());
        Ok(self.balances.clone())
    }

    fn list_unspent(&self, addresses: &[String]) -> Result<Vec<Utxo>, BackendError> {
        self.unspent_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_unspent_query.lock().unwrap() = Some(addresses.to_vec());
        Ok(self.unspent.clone())
    }

    fn list_transactions(&self, txids: &[String]) -> Result<Vec<PrevTransaction>, BackendError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_transactions_query.lock().unwrap() = Some(txids.to_vec());
        Ok(self.transactions.clone())
    }

    fn pushtx(&self, hex: &str, _options: &PushOptions) -> Result<String, BackendError> {
        self.pushed.lock().unwrap().push(hex.to_string());
        Ok(format!("pushed-{}", self.pushed.lock().unwrap().len()))
    }

    fn block_height(&self) -> Result<u64, BackendError> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.height)
    }

    fn verify_signatures(&self, _hex: &str, _options: &PushOptions) -> Result<(), BackendError> {
        Ok(())
    }
}
