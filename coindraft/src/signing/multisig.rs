//! Multisig address derivation from extended public keys
//!
//! An M-of-N construction is declared as a list of participant xpubs, a
//! shared derivation path and a threshold. The effective address is the
//! P2SH hash of the standard CHECKMULTISIG redeem script over the derived
//! child keys, with keys kept in declaration order.

use std::str::FromStr;

use bitcoin::bip32::{ChildNumber, DerivationPath, ExtendedPubKey};
use bitcoin::blockdata::opcodes;
use bitcoin::blockdata::script::Builder;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::{Address, Network, PublicKey, ScriptBuf};

use crate::logging::sanitize_for_logging;
use crate::signing::types::{MultisigPubkey, XpubNode};
use crate::signing::SigningError;

/// Derive the P2SH address of an M-of-N construction.
pub fn derive_address(
    xpubs: &[String],
    path: &[u32],
    threshold: u32,
    network: Network,
) -> Result<String, SigningError> {
    let keys = derived_keys(xpubs, path)?;
    if threshold == 0 || threshold as usize > keys.len() {
        return Err(SigningError::Script(format!(
            "threshold {} is not satisfiable with {} keys",
            threshold,
            keys.len()
        )));
    }
    let script = redeem_script(threshold, &keys);
    let address = Address::p2sh(&script, network).map_err(|e| SigningError::Script(e.to_string()))?;
    Ok(address.to_string())
}

/// Build the device-facing redeem metadata for an M-of-N construction:
/// root node data per participant and one empty signature slot each.
pub fn redeem_descriptor(
    xpubs: &[String],
    path: &[u32],
    threshold: u32,
) -> Result<crate::signing::types::MultisigRedeem, SigningError> {
    let pubkeys = xpubs
        .iter()
        .map(|xpub| {
            let key = parse_xpub(xpub)?;
            Ok(MultisigPubkey {
                address_n: path.to_vec(),
                node: XpubNode {
                    chain_code: hex::encode(key.chain_code.to_bytes()),
                    depth: 0,
                    child_num: 0,
                    fingerprint: 0,
                    public_key: hex::encode(key.public_key.serialize()),
                },
            })
        })
        .collect::<Result<Vec<_>, SigningError>>()?;

    Ok(crate::signing::types::MultisigRedeem {
        signatures: vec![String::new(); pubkeys.len()],
        m: threshold,
        pubkeys,
    })
}

fn parse_xpub(xpub: &str) -> Result<ExtendedPubKey, SigningError> {
    ExtendedPubKey::from_str(xpub)
        .map_err(|e| SigningError::InvalidXpub(format!("{}: {}", sanitize_for_logging(xpub), e)))
}

fn derived_keys(xpubs: &[String], path: &[u32]) -> Result<Vec<PublicKey>, SigningError> {
    let secp = Secp256k1::verification_only();
    let path = derivation_path(path)?;
    xpubs
        .iter()
        .map(|xpub| {
            let key = parse_xpub(xpub)?;
            let child = key
                .derive_pub(&secp, &path)
                .map_err(|e| SigningError::Derivation(e.to_string()))?;
            Ok(PublicKey::new(child.public_key))
        })
        .collect()
}

fn derivation_path(path: &[u32]) -> Result<DerivationPath, SigningError> {
    let children = path
        .iter()
        .map(|&index| {
            ChildNumber::from_normal_idx(index).map_err(|e| SigningError::Derivation(e.to_string()))
        })
        .collect::<Result<Vec<_>, SigningError>>()?;
    Ok(DerivationPath::from(children))
}

fn redeem_script(m: u32, keys: &[PublicKey]) -> ScriptBuf {
    let mut builder = Builder::new().push_int(i64::from(m));
    for key in keys {
        builder = builder.push_key(key);
    }
    builder
        .push_int(keys.len() as i64)
        .push_opcode(opcodes::all::OP_CHECKMULTISIG)
        .into_script()
}
