use crate::notification::{DispatchError, NotificationPort};
use async_trait::async_trait;
use teloxide::prelude::*;

/// Telegram bot used purely as a message sink.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

#[async_trait]
impl NotificationPort for TelegramNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DispatchError> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}
