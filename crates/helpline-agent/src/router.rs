// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound user messages and the three-tier reply decision.

use std::time::Instant;

use helpline_core::types::{ConversationMode, NewMessage, Role, TakeoverStatus};
use helpline_core::{HelplineError, validate};
use serde::Serialize;
use tracing::{debug, info};

use crate::SupportAgent;

/// What the widget gets back for one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReply {
    /// `None` while a human holds the conversation.
    pub reply: Option<String>,
    pub role: Option<Role>,
    pub confidence: Option<f64>,
    /// Set when the pattern bot answered.
    pub pattern_id: Option<i64>,
    /// Newest timestamp written for this request; a poll cursor.
    pub timestamp: i64,
    pub mode: ConversationMode,
}

impl SupportAgent {
    /// Current mode of a conversation.
    pub async fn mode(&self, conversation_id: &str) -> Result<ConversationMode, HelplineError> {
        let active = self
            .storage
            .get_takeover(conversation_id)
            .await?
            .is_some_and(|t| t.status == TakeoverStatus::Active);
        Ok(if active {
            ConversationMode::Human
        } else {
            ConversationMode::Auto
        })
    }

    /// Append a user message and answer it from the right tier.
    pub async fn handle_user_message(
        &self,
        client_id: &str,
        text: &str,
    ) -> Result<UserReply, HelplineError> {
        let client_id = validate::client_id(client_id)?;
        let text = validate::message_text(text)?;
        let started = Instant::now();

        let guard = self.locks.acquire(client_id).await;

        let user_msg = self.storage.append_message(&NewMessage::user(client_id, text)).await?;
        helpline_prometheus::record_message("user");

        if self.mode(client_id).await? == ConversationMode::Human {
            drop(guard);
            debug!(client_id, "conversation under takeover, no automated reply");
            self.notify_admin(&format!("👤 [{client_id}] (temsilci modunda): {text}"))
                .await;
            return Ok(UserReply {
                reply: None,
                role: None,
                confidence: None,
                pattern_id: None,
                timestamp: user_msg.timestamp,
                mode: ConversationMode::Human,
            });
        }

        let patterns = self.storage.list_patterns().await?;
        let result = self.matcher.match_message(text, &patterns);

        let (reply_msg, pattern_id, escalated) = match result.matched {
            Some(pattern) if !result.should_escalate => {
                let msg = self
                    .storage
                    .append_message(&NewMessage::bot(client_id, &pattern.response, result.confidence))
                    .await?;
                helpline_matcher::record_match(self.storage.as_ref(), pattern.id).await?;
                (msg, Some(pattern.id), false)
            }
            _ => {
                helpline_prometheus::record_escalation();
                let answer = self.escalation.escalate(text).await;
                let msg = self
                    .storage
                    .append_message(&NewMessage::ai(client_id, &answer.response, answer.confidence))
                    .await?;
                (msg, None, true)
            }
        };
        self.analytics.record(reply_msg.role, reply_msg.timestamp).await?;
        helpline_prometheus::record_message(&reply_msg.role.to_string());
        helpline_prometheus::record_reply_latency(started.elapsed());
        drop(guard);

        info!(
            client_id,
            role = %reply_msg.role,
            confidence = reply_msg.confidence.unwrap_or_default(),
            "reply sent"
        );

        if escalated || self.notify.notify_user_messages {
            let tier = if escalated { "🤖 AI" } else { "📚 Bot" };
            self.notify_admin(&format!(
                "💬 [{client_id}]: {text}\n{tier}: {}",
                reply_msg.content
            ))
            .await;
        }

        Ok(UserReply {
            reply: Some(reply_msg.content),
            role: Some(reply_msg.role),
            confidence: reply_msg.confidence,
            pattern_id,
            timestamp: reply_msg.timestamp,
            mode: ConversationMode::Auto,
        })
    }
}
