// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling command listener for the admin chat.

use std::sync::Arc;

use helpline_agent::SupportAgent;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::handler::{self, ChannelSession};

/// True when the message comes from the configured admin chat.
pub fn is_admin_chat(chat: ChatId, admin_chat: ChatId) -> bool {
    chat == admin_chat
}

/// Start the dispatcher. It stops when `cancel` fires.
pub fn spawn_listener(
    bot: Bot,
    admin_chat: ChatId,
    agent: Arc<SupportAgent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let sessions = Arc::new(ChannelSession::new());

    tokio::spawn(async move {
        let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let agent = agent.clone();
            let sessions = sessions.clone();
            async move {
                if !is_admin_chat(msg.chat.id, admin_chat) {
                    debug!(chat_id = msg.chat.id.0, "ignoring message outside the admin chat");
                    return respond(());
                }
                let Some(text) = msg.text() else {
                    return respond(());
                };

                let reply = handler::handle_text(&agent, &sessions, text).await;
                if let Err(e) = bot.send_message(msg.chat.id, crate::truncate(&reply)).await {
                    warn!(error = %e, "failed to answer admin command");
                }
                respond(())
            }
        });

        let mut dispatcher = Dispatcher::builder(bot, handler)
            .default_handler(|_| async {})
            .build();

        let shutdown = dispatcher.shutdown_token();
        tokio::spawn(async move {
            cancel.cancelled().await;
            match shutdown.shutdown() {
                Ok(done) => {
                    done.await;
                    info!("Telegram listener stopped");
                }
                Err(e) => debug!(error = ?e, "Telegram listener was not running"),
            }
        });

        info!(chat_id = admin_chat.0, "starting Telegram command listener");
        dispatcher.dispatch().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_chat_is_accepted() {
        assert!(is_admin_chat(ChatId(42), ChatId(42)));
        assert!(!is_admin_chat(ChatId(7), ChatId(42)));
    }
}
