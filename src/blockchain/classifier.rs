use crate::blockchain::models::{decode_native, decode_token, DecodeError};
use crate::config::Config;
use crate::models::{DepositEvent, TransferBatch, Wallet};
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Turns raw explorer records into ordered deposit events for one wallet.
#[derive(Debug, Clone)]
pub struct TransactionClassifier {
    native_symbol: String,
    native_decimals: u32,
    default_token_symbol: String,
}

impl Default for TransactionClassifier {
    fn default() -> Self {
        Self::new("TRX", 6, "USDT")
    }
}

impl TransactionClassifier {
    pub fn new(native_symbol: &str, native_decimals: u32, default_token_symbol: &str) -> Self {
        Self {
            native_symbol: native_symbol.to_string(),
            native_decimals,
            default_token_symbol: default_token_symbol.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.native_symbol,
            config.native_decimals,
            &config.default_token_symbol,
        )
    }

    /// Decode both lists, drop everything that is not a deposit to this wallet,
    /// and order the rest newest first.
    pub fn classify(&self, wallet: &Wallet, batch: &TransferBatch) -> Vec<DepositEvent> {
        let native = batch.native.iter().filter_map(|raw| {
            keep(
                "native",
                raw,
                decode_native(
                    raw,
                    &wallet.native_address,
                    &self.native_symbol,
                    self.native_decimals,
                ),
            )
        });

        let token = batch.token.iter().filter_map(|raw| {
            keep(
                "token",
                raw,
                decode_token(raw, &wallet.token_address, &self.default_token_symbol),
            )
        });

        let mut events: Vec<DepositEvent> = native.chain(token).collect();
        sort_newest_first(&mut events);

        debug!(
            "Classified {} of {} records as deposits for chat {}",
            events.len(),
            batch.len(),
            wallet.chat_id
        );

        events
    }
}

/// Missing timestamps sort after every timestamped event; ties keep input order.
pub fn sort_newest_first(events: &mut [DepositEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn keep(
    path: &str,
    raw: &Value,
    result: Result<DepositEvent, DecodeError>,
) -> Option<DepositEvent> {
    match result {
        Ok(event) => Some(event),
        Err(DecodeError::NotTransfer(_)) | Err(DecodeError::Destination { .. }) => None,
        Err(e @ DecodeError::Scale { .. }) => {
            warn!("Dropping {} record: {}", path, e);
            trace!("Dropped record: {}", raw);
            None
        }
        Err(e) => {
            debug!("Dropping {} record: {}", path, e);
            trace!("Dropped record: {}", raw);
            None
        }
    }
}
