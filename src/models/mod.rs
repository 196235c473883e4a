// Wallet and processed-record rows from the database
// DepositEvent produced by classification
// TransferBatch handed from the fetcher to the classifier

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub chat_id: i64,
    pub native_address: String,
    pub token_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Native,
    Token,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized incoming transfer, ready for notification.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositEvent {
    pub kind: TransferKind,
    pub symbol: String,
    /// Already scaled by the asset's decimals.
    pub amount: Decimal,
    pub transaction_id: String,
    /// Block timestamp in epoch milliseconds.
    pub timestamp: Option<i64>,
    pub destination_address: String,
}

/// Raw upstream records for one wallet, as returned by the explorer.
#[derive(Debug, Clone, Default)]
pub struct TransferBatch {
    pub native: Vec<Value>,
    pub token: Vec<Value>,
}

impl TransferBatch {
    pub fn is_empty(&self) -> bool {
        self.native.is_empty() && self.token.is_empty()
    }

    pub fn len(&self) -> usize {
        self.native.len() + self.token.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub transaction_id: String,
    pub kind: Option<String>,
    pub processed_at: i64,
}
