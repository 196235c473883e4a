use crate::blockchain::address::{hex_to_base58, AddressError};
use crate::models::{DepositEvent, TransferKind};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Contract type of a plain TRX transfer.
pub const TRANSFER_CONTRACT: &str = "TransferContract";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Not a transfer contract: {0}")]
    NotTransfer(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid destination address: {0}")]
    Address(#[from] AddressError),

    #[error("Amount is not a non-negative integer: {0}")]
    InvalidAmount(String),

    #[error("Amount {raw} cannot be scaled by {decimals} decimals")]
    Scale { raw: String, decimals: u32 },

    #[error("Destination {actual} does not match wallet address {expected}")]
    Destination { expected: String, actual: String },
}

/// Entry of `/v1/accounts/{address}/transactions`.
#[derive(Debug, Deserialize)]
pub struct NativeTransaction {
    #[serde(rename = "txID")]
    pub tx_id: Option<String>,
    pub transaction_id: Option<String>,
    pub block_timestamp: Option<i64>,
    pub raw_data: Option<RawData>,
}

#[derive(Debug, Deserialize)]
pub struct RawData {
    #[serde(default)]
    pub contract: Vec<Contract>,
}

#[derive(Debug, Deserialize)]
pub struct Contract {
    #[serde(rename = "type")]
    pub contract_type: Option<String>,
    pub parameter: Option<ContractParameter>,
}

#[derive(Debug, Deserialize)]
pub struct ContractParameter {
    pub value: Option<TransferValue>,
}

#[derive(Debug, Deserialize)]
pub struct TransferValue {
    pub amount: Option<Value>,
    pub to_address: Option<String>,
    pub owner_address: Option<String>,
}

/// Entry of `/v1/accounts/{address}/transactions/trc20`.
#[derive(Debug, Deserialize)]
pub struct Trc20Transfer {
    pub transaction_id: Option<String>,
    pub block_timestamp: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<Value>,
    pub token_info: Option<TokenInfo>,
}

#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    pub symbol: Option<String>,
    pub address: Option<String>,
    pub decimals: Option<u32>,
    pub name: Option<String>,
}

/// Decode one native account-history record into a deposit to `wallet_address`.
pub fn decode_native(
    raw: &Value,
    wallet_address: &str,
    symbol: &str,
    decimals: u32,
) -> Result<DepositEvent, DecodeError> {
    let tx: NativeTransaction = serde_json::from_value(raw.clone())?;

    let contract = tx
        .raw_data
        .as_ref()
        .and_then(|data| data.contract.first())
        .ok_or(DecodeError::MissingField("raw_data.contract"))?;

    let contract_type = contract.contract_type.as_deref().unwrap_or_default();
    if contract_type != TRANSFER_CONTRACT {
        return Err(DecodeError::NotTransfer(contract_type.to_string()));
    }

    let value = contract
        .parameter
        .as_ref()
        .and_then(|p| p.value.as_ref())
        .ok_or(DecodeError::MissingField("parameter.value"))?;

    let to_hex = value
        .to_address
        .as_deref()
        .ok_or(DecodeError::MissingField("to_address"))?;
    let destination = hex_to_base58(to_hex)?;
    ensure_destination(wallet_address, &destination)?;

    let raw_amount = parse_raw_amount(value.amount.as_ref())?;
    let amount = scale_amount(&raw_amount, decimals)?;

    let transaction_id = tx
        .tx_id
        .or(tx.transaction_id)
        .filter(|id| !id.is_empty())
        .ok_or(DecodeError::MissingField("txID"))?;

    Ok(DepositEvent {
        kind: TransferKind::Native,
        symbol: symbol.to_string(),
        amount,
        transaction_id,
        timestamp: tx.block_timestamp,
        destination_address: destination,
    })
}

/// Decode one TRC20 transfer record into a deposit to `wallet_address`.
pub fn decode_token(
    raw: &Value,
    wallet_address: &str,
    default_symbol: &str,
) -> Result<DepositEvent, DecodeError> {
    let transfer: Trc20Transfer = serde_json::from_value(raw.clone())?;

    let destination = transfer.to.ok_or(DecodeError::MissingField("to"))?;
    ensure_destination(wallet_address, &destination)?;

    let raw_amount = parse_raw_amount(transfer.value.as_ref())?;

    let token_info = transfer
        .token_info
        .ok_or(DecodeError::MissingField("token_info"))?;
    let decimals = token_info
        .decimals
        .ok_or(DecodeError::MissingField("token_info.decimals"))?;
    let amount = scale_amount(&raw_amount, decimals)?;

    let symbol = token_info
        .symbol
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_symbol.to_string());

    let transaction_id = transfer
        .transaction_id
        .filter(|id| !id.is_empty())
        .ok_or(DecodeError::MissingField("transaction_id"))?;

    Ok(DepositEvent {
        kind: TransferKind::Token,
        symbol,
        amount,
        transaction_id,
        timestamp: transfer.block_timestamp,
        destination_address: destination,
    })
}

fn ensure_destination(expected: &str, actual: &str) -> Result<(), DecodeError> {
    if expected.eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(DecodeError::Destination {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Raw amounts arrive as JSON integers (TRX, in sun) or integer strings (TRC20).
///
/// Returns the plain decimal digits; TRC20 values are uint256 and may not fit
/// any machine integer.
pub fn parse_raw_amount(value: Option<&Value>) -> Result<String, DecodeError> {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| n.to_string())
            .ok_or_else(|| DecodeError::InvalidAmount(n.to_string())),
        Some(Value::String(s)) => {
            let digits = s.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DecodeError::InvalidAmount(s.clone()));
            }
            Ok(digits.to_string())
        }
        Some(other) => Err(DecodeError::InvalidAmount(other.to_string())),
        None => Err(DecodeError::MissingField("amount")),
    }
}

/// `digits / 10^decimals`, with trailing zeros removed.
///
/// Exact whenever the result fits a `Decimal` (96-bit mantissa, scale <= 28).
/// Otherwise low-order fractional digits are truncated until it does. Only an
/// integer part beyond `Decimal::MAX` is an error.
pub fn scale_amount(digits: &str, decimals: u32) -> Result<Decimal, DecodeError> {
    let mut mantissa = digits.trim_start_matches('0');
    let mut scale = decimals;

    loop {
        if mantissa.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let exact = mantissa
            .parse::<i128>()
            .ok()
            .and_then(|m| Decimal::try_from_i128_with_scale(m, scale).ok());
        if let Some(amount) = exact {
            return Ok(amount.normalize());
        }

        if scale == 0 {
            return Err(DecodeError::Scale {
                raw: digits.to_string(),
                decimals,
            });
        }
        mantissa = &mantissa[..mantissa.len() - 1];
        scale -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount("3000000", 6).unwrap().to_string(), "3");
        assert_eq!(
            scale_amount("1000000000000000000", 18).unwrap().to_string(),
            "1"
        );
        assert_eq!(scale_amount("1500000", 6).unwrap().to_string(), "1.5");
        assert_eq!(scale_amount("0", 6).unwrap().to_string(), "0");
        assert_eq!(scale_amount("000120", 2).unwrap().to_string(), "1.2");
    }

    #[test]
    fn test_scale_amount_beyond_decimal_precision() {
        // 2 * 10^12 tokens at 18 decimals: 31 significant digits
        assert_eq!(
            scale_amount("2000000000000000000000000000000", 18)
                .unwrap()
                .to_string(),
            "2000000000000"
        );
        // Longer than u128, fractional tail truncated
        let amount = scale_amount(&format!("123456789{}", "9".repeat(60)), 60).unwrap();
        assert_eq!(amount.trunc().to_string(), "123456789");
        assert!(amount > Decimal::new(123_456_789, 0));

        // More decimals than Decimal's maximum scale
        assert_eq!(scale_amount("15", 30).unwrap().to_string(), "0");
        assert_eq!(
            scale_amount("1500000000000000000000000000000", 30)
                .unwrap()
                .to_string(),
            "1.5"
        );
    }

    #[test]
    fn test_scale_amount_integer_part_too_large() {
        let huge = "1".repeat(40);
        assert!(matches!(
            scale_amount(&huge, 0),
            Err(DecodeError::Scale { decimals: 0, .. })
        ));
        // Same digits with enough decimals still fit
        assert!(scale_amount(&huge, 18).is_ok());
    }

    #[test]
    fn test_parse_raw_amount() {
        assert_eq!(parse_raw_amount(Some(&json!(5_000_000))).unwrap(), "5000000");
        assert_eq!(
            parse_raw_amount(Some(&json!(" 1000000000000000000 "))).unwrap(),
            "1000000000000000000"
        );
        let uint256_max =
            "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(parse_raw_amount(Some(&json!(uint256_max))).unwrap(), uint256_max);
        assert!(parse_raw_amount(Some(&json!(-1))).is_err());
        assert!(parse_raw_amount(Some(&json!(1.5))).is_err());
        assert!(parse_raw_amount(Some(&json!("abc"))).is_err());
        assert!(parse_raw_amount(Some(&json!("-5"))).is_err());
        assert!(parse_raw_amount(Some(&json!("1e18"))).is_err());
        assert!(parse_raw_amount(Some(&json!(""))).is_err());
        assert!(parse_raw_amount(Some(&json!(null))).is_err());
        assert!(matches!(
            parse_raw_amount(None),
            Err(DecodeError::MissingField("amount"))
        ));
    }
}
