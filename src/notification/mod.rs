//! Outbound deposit notifications.
//!
//! The pipeline only knows about [`NotificationPort`]; the Telegram transport
//! is one implementation of it, wired in by the binary.

pub mod dispatcher;
pub mod telegram;

pub use dispatcher::{format_deposit_message, NotificationDispatcher, UNKNOWN_TIME};
pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Fire-and-forget text delivery to a chat.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DispatchError>;
}
