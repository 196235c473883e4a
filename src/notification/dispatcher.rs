use crate::models::{DepositEvent, TransferKind};
use crate::notification::{DispatchError, NotificationPort};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Rendered in place of the block time when the record had none.
pub const UNKNOWN_TIME: &str = "unknown";

/// Formats deposit events and hands them to the notification port.
#[derive(Clone)]
pub struct NotificationDispatcher {
    port: Arc<dyn NotificationPort>,
    offset: FixedOffset,
}

impl NotificationDispatcher {
    pub fn new(port: Arc<dyn NotificationPort>, utc_offset_hours: i32) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    "Invalid UTC offset {}h, rendering times in UTC",
                    utc_offset_hours
                );
                Utc.fix()
            });

        Self { port, offset }
    }

    pub async fn dispatch(&self, chat_id: i64, event: &DepositEvent) -> Result<(), DispatchError> {
        let message = format_deposit_message(event, &self.offset);
        self.port.send(chat_id, &message).await?;
        debug!(
            "Sent {} deposit {} to chat {}",
            event.symbol, event.transaction_id, chat_id
        );
        Ok(())
    }
}

/// Human-readable notification text for one deposit.
pub fn format_deposit_message(event: &DepositEvent, offset: &FixedOffset) -> String {
    let label = match event.kind {
        TransferKind::Native => "Deposit",
        TransferKind::Token => "Token Deposit",
    };

    format!(
        "💰 [{} {}]\nAmount: {} {}\n🕒 Time: {}\n🔗 Transaction: {}",
        event.symbol,
        label,
        event.amount,
        event.symbol,
        format_timestamp(event.timestamp, offset),
        event.transaction_id
    )
}

fn format_timestamp(timestamp_ms: Option<i64>, offset: &FixedOffset) -> String {
    timestamp_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| {
            utc.with_timezone(offset)
                .format("%Y-%m-%d %H:%M:%S (UTC%:z)")
                .to_string()
        })
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}
