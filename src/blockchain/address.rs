//! TRON address encoding.
//!
//! On-chain records carry addresses as 21 raw bytes in hex (`41` version
//! byte followed by the 20-byte account id). Users and the TRC20 endpoints
//! use the base58check form, which always starts with `T`.

use thiserror::Error;

/// Version byte of mainnet account addresses.
pub const ADDRESS_PREFIX: u8 = 0x41;
/// Length of a decoded address, version byte included.
pub const ADDRESS_LEN: usize = 21;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid hex address: {0}")]
    InvalidHex(String),

    #[error("Invalid base58check address: {0}")]
    InvalidBase58(String),

    #[error("Unexpected address length {len} for {address}")]
    InvalidLength { address: String, len: usize },

    #[error("Unexpected address version byte {prefix:#04x} for {address}")]
    InvalidPrefix { address: String, prefix: u8 },
}

/// Convert a hex address (`41…`, or `0x…` with the prefix implied) to base58check.
///
/// Input that is already a valid base58check address is returned unchanged.
pub fn hex_to_base58(hex_address: &str) -> Result<String, AddressError> {
    let trimmed = hex_address.trim();
    let normalized = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(rest) => format!("41{}", rest),
        None => trimmed.to_string(),
    };

    let bytes = match hex::decode(&normalized) {
        Ok(bytes) => bytes,
        Err(_) if decode_base58(trimmed).is_ok() => return Ok(trimmed.to_string()),
        Err(_) => return Err(AddressError::InvalidHex(hex_address.to_string())),
    };
    check_bytes(hex_address, &bytes)?;

    Ok(bs58::encode(bytes).with_check().into_string())
}

/// Convert a base58check address to its lowercase hex form.
pub fn base58_to_hex(address: &str) -> Result<String, AddressError> {
    let bytes = decode_base58(address)?;
    Ok(hex::encode(bytes))
}

/// Decode and verify a base58check address, returning the raw 21 bytes.
pub fn decode_base58(address: &str) -> Result<Vec<u8>, AddressError> {
    let bytes = bs58::decode(address.trim())
        .with_check(None)
        .into_vec()
        .map_err(|_| AddressError::InvalidBase58(address.to_string()))?;
    check_bytes(address, &bytes)?;
    Ok(bytes)
}

fn check_bytes(address: &str, bytes: &[u8]) -> Result<(), AddressError> {
    if bytes.len() != ADDRESS_LEN {
        return Err(AddressError::InvalidLength {
            address: address.to_string(),
            len: bytes.len(),
        });
    }
    if bytes[0] != ADDRESS_PREFIX {
        return Err(AddressError::InvalidPrefix {
            address: address.to_string(),
            prefix: bytes[0],
        });
    }
    Ok(())
}
