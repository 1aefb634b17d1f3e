//! Telegram delivery via the Bot API.
//!
//! Requires the `telegram` feature to be enabled.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::info;

use super::format::telegram_text;
use crate::domain::notification::Channel;
use crate::error::{Error, Result};
use crate::port::outbound::channel::{ChannelSender, RenderedNotification};

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Configuration for the Telegram sender.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
}

impl TelegramConfig {
    /// Reads `TELEGRAM_BOT_TOKEN`. Returns `None` if unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var(BOT_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())?;
        Some(Self { bot_token })
    }
}

/// Sends MarkdownV2 messages to a user's chat.
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            bot: Bot::new(config.bot_token),
        }
    }
}

#[async_trait]
impl ChannelSender for TelegramSender {
    fn channel(&self) -> Channel {
        Channel::Telegram
    }

    async fn send(&self, destination: &str, content: &RenderedNotification) -> Result<bool> {
        let chat_id: i64 = destination
            .trim()
            .parse()
            .map_err(|_| Error::Channel(format!("invalid Telegram chat id '{destination}'")))?;

        self.bot
            .send_message(ChatId(chat_id), telegram_text(content))
            .parse_mode(ParseMode::MarkdownV2)
            .await
            .map_err(|e| Error::Channel(format!("Telegram send failed: {e}")))?;

        info!(chat_id, "Telegram notification sent");
        Ok(true)
    }
}
