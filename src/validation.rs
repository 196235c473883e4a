use crate::blockchain::address::decode_base58;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid TRON address format: {0}")]
    InvalidTronAddress(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub fn validate_tron_address(address: &str) -> Result<(), ValidationError> {
    // Check if address is empty
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    // Mainnet account addresses are 34 base58 chars starting with 'T'
    if address.len() != 34 || !address.starts_with('T') {
        return Err(ValidationError::InvalidTronAddress(address.to_string()));
    }

    // Checksum, length and version byte
    decode_base58(address).map_err(|_| ValidationError::InvalidTronAddress(address.to_string()))?;

    Ok(())
}

pub fn validate_chat_id(chat_id: i64) -> Result<(), ValidationError> {
    if chat_id == 0 {
        return Err(ValidationError::InvalidParameter(
            "chat_id must be non-zero".to_string(),
        ));
    }
    Ok(())
}
