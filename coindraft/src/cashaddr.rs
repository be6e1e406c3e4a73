//! Cash-address codec
//!
//! Converts between the legacy base58check address form used by most node
//! software and the `bitcoincash:`/`bchtest:` cash-address form, in both
//! directions. The conversion is purely textual: both encodings carry the
//! same 20 byte hash, so which underlying output an address references never
//! changes.
//!
//! Only the two standard 160-bit payload types are handled (P2PKH and
//! P2SH); anything else is rejected rather than guessed at.

use thiserror::Error;

/// Errors produced while converting between address encodings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CashAddrError {
    #[error("base58 decoding failed: {0}")]
    Base58(String),

    #[error("address has no cash-address prefix")]
    MissingPrefix,

    #[error("unknown address prefix: {0}")]
    UnknownPrefix(String),

    #[error("invalid character in address: {0}")]
    InvalidCharacter(char),

    #[error("address checksum mismatch")]
    BadChecksum,

    #[error("address payload has unexpected length")]
    InvalidLength,

    #[error("unknown address version byte: {0:#04x}")]
    UnknownVersion(u8),
}

const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Convert a legacy base58check address into cash-address form.
///
/// The target prefix (`bitcoincash:` or `bchtest:`) is inferred from the
/// legacy version byte.
pub fn from_legacy(address: &str) -> Result<String, CashAddrError> {
    let raw = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| CashAddrError::Base58(e.to_string()))?;
    if raw.len() != 21 {
        return Err(CashAddrError::InvalidLength);
    }

    let (prefix, kind) = match raw[0] {
        0x00 => ("bitcoincash", 0u8),
        0x05 => ("bitcoincash", 1),
        0x6f => ("bchtest", 0),
        0xc4 => ("bchtest", 1),
        other => return Err(CashAddrError::UnknownVersion(other)),
    };

    // Payload: version (type in bits 6-3, size bits 2-0; zero for 160 bit
    // hashes) followed by the hash itself.
    let mut payload = vec![kind << 3];
    payload.extend_from_slice(&raw[1..]);

    let mut data = convert_bits(&payload, 8, 5, true)?;
    let checksum = checksum(prefix, &data);
    data.extend_from_slice(&checksum);

    let body: String = data.iter().map(|&b| CHARSET[b as usize] as char).collect();
    Ok(format!("{}:{}", prefix, body))
}

/// Convert a cash-address back into its legacy base58check form.
pub fn to_legacy(address: &str) -> Result<String, CashAddrError> {
    let (prefix, body) = address.split_once(':').ok_or(CashAddrError::MissingPrefix)?;
    let prefix = prefix.to_ascii_lowercase();

    let mut data = Vec::with_capacity(body.len());
    for c in body.chars() {
        let lower = c.to_ascii_lowercase();
        let value = CHARSET
            .iter()
            .position(|&x| x as char == lower)
            .ok_or(CashAddrError::InvalidCharacter(c))?;
        data.push(value as u8);
    }
    if data.len() <= 8 {
        return Err(CashAddrError::InvalidLength);
    }

    let mut values = expand_prefix(&prefix);
    values.extend_from_slice(&data);
    if polymod(&values) != 1 {
        return Err(CashAddrError::BadChecksum);
    }

    let payload = convert_bits(&data[..data.len() - 8], 5, 8, false)?;
    if payload.len() != 21 || payload[0] & 0x07 != 0 {
        return Err(CashAddrError::InvalidLength);
    }

    let version = match (prefix.as_str(), payload[0] >> 3) {
        ("bitcoincash", 0) => 0x00,
        ("bitcoincash", 1) => 0x05,
        ("bchtest", 0) => 0x6f,
        ("bchtest", 1) => 0xc4,
        _ => return Err(CashAddrError::UnknownPrefix(prefix)),
    };

    let mut raw = vec![version];
    raw.extend_from_slice(&payload[1..]);
    Ok(bs58::encode(raw).with_check().into_string())
}

/// Convert to legacy form only when the text actually carries a
/// cash-address prefix; legacy input passes through untouched.
pub fn to_legacy_if_needed(address: &str) -> Result<String, CashAddrError> {
    if address.contains(':') {
        to_legacy(address)
    } else {
        Ok(address.to_string())
    }
}

/// Convert between bit group sizes
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, CashAddrError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut result = Vec::new();
    let max_value = (1u32 << to) - 1;

    for &value in data {
        if u32::from(value) >> from != 0 {
            return Err(CashAddrError::InvalidLength);
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || (acc << (to - bits)) & max_value != 0 {
        return Err(CashAddrError::InvalidLength);
    }

    Ok(result)
}

fn checksum(prefix: &str, payload: &[u8]) -> [u8; 8] {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(payload);
    values.extend_from_slice(&[0u8; 8]);

    let polymod = polymod(&values) ^ 1;

    let mut checksum = [0u8; 8];
    for (i, byte) in checksum.iter_mut().enumerate() {
        *byte = ((polymod >> (5 * (7 - i))) & 0x1f) as u8;
    }
    checksum
}

/// Lower 5 bits of each prefix character, followed by a zero separator
fn expand_prefix(prefix: &str) -> Vec<u8> {
    let mut values: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    values.push(0);
    values
}

fn polymod(values: &[u8]) -> u64 {
    const GENERATORS: [u64; 5] = [
        0x98f2bc8e61,
        0x79b76d99e2,
        0xf33e5fb3c4,
        0xae2eabe2a8,
        0x1e4f43e470,
    ];

    let mut c: u64 = 1;
    for &value in values {
        let c0 = c >> 35;
        c = ((c & 0x07ffffffff) << 5) ^ u64::from(value);
        for (i, &generator) in GENERATORS.iter().enumerate() {
            if (c0 >> i) & 1 != 0 {
                c ^= generator;
            }
        }
    }
    c
}
