// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram admin channel for the Helpline support relay.
//!
//! [`TelegramNotifier`] pushes notifications and login codes to the single
//! configured admin chat. The [`listener`] turns commands typed in that chat
//! into agent operations.

pub mod commands;
pub mod handler;
pub mod listener;

use async_trait::async_trait;
use helpline_config::model::TelegramConfig;
use helpline_core::HelplineError;
use helpline_core::traits::{ChannelAdapter, PluginAdapter};
use helpline_core::types::{AdapterType, HealthStatus};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, info};

pub use listener::spawn_listener;

/// Longest text Telegram accepts in one message.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Pushes text to the admin chat via the Telegram Bot API.
pub struct TelegramNotifier {
    bot: Bot,
    admin_chat: ChatId,
}

impl TelegramNotifier {
    /// Requires both `telegram.bot_token` and `telegram.admin_chat_id`.
    pub fn new(config: &TelegramConfig) -> Result<Self, HelplineError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            HelplineError::Config("telegram.bot_token is required for the Telegram notifier".into())
        })?;
        if token.is_empty() {
            return Err(HelplineError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        let admin_chat_id = config.admin_chat_id.ok_or_else(|| {
            HelplineError::Config("telegram.admin_chat_id is required with a bot token".into())
        })?;

        Ok(Self {
            bot: Bot::new(token),
            admin_chat: ChatId(admin_chat_id),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn admin_chat(&self) -> ChatId {
        self.admin_chat
    }
}

#[async_trait]
impl PluginAdapter for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HelplineError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), HelplineError> {
        debug!("Telegram notifier shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramNotifier {
    async fn send_text(&self, text: &str) -> Result<(), HelplineError> {
        self.bot
            .send_message(self.admin_chat, truncate(text))
            .await
            .map_err(|e| HelplineError::Upstream {
                message: format!("failed to send Telegram message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

/// Stand-in channel when no bot token is configured. Pushes go to the log.
#[derive(Debug, Default)]
pub struct LoggingChannel;

#[async_trait]
impl PluginAdapter for LoggingChannel {
    fn name(&self) -> &str {
        "log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HelplineError> {
        Ok(HealthStatus::Degraded(
            "Telegram not configured, admin pushes are only logged".into(),
        ))
    }

    async fn shutdown(&self) -> Result<(), HelplineError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for LoggingChannel {
    async fn send_text(&self, text: &str) -> Result<(), HelplineError> {
        info!(text, "admin push (no Telegram configured)");
        Ok(())
    }
}

/// Cut `text` to [`MAX_MESSAGE_CHARS`] characters.
pub(crate) fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
