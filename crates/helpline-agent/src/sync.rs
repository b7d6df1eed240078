// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cursor-based polling for widgets and the admin console.
//!
//! Clients remember the `last_timestamp` of the previous poll and pass it
//! back as `after`. Since store timestamps strictly increase, a message is
//! delivered exactly once per cursor chain.

use helpline_core::types::{AdminSession, ConversationSummary};
use helpline_core::{HelplineError, Message, validate};
use serde::Serialize;

use crate::SupportAgent;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub new_messages: Vec<Message>,
    /// Timestamp of the newest returned message, or `after` when none.
    pub last_timestamp: i64,
}

impl PollResponse {
    fn new(new_messages: Vec<Message>, after: i64) -> Self {
        let last_timestamp = new_messages.last().map_or(after, |m| m.timestamp);
        Self {
            new_messages,
            last_timestamp,
        }
    }
}

impl SupportAgent {
    /// Messages of one conversation newer than `after`.
    pub async fn poll(&self, client_id: &str, after: i64) -> Result<PollResponse, HelplineError> {
        let client_id = validate::client_id(client_id)?;
        let messages = self.storage.messages_after(Some(client_id), after).await?;
        Ok(PollResponse::new(messages, after))
    }

    /// Messages of every conversation newer than `after`.
    pub async fn poll_admin(
        &self,
        session: &AdminSession,
        after: i64,
    ) -> Result<PollResponse, HelplineError> {
        self.authorize(session).await?;
        let messages = self.storage.messages_after(None, after).await?;
        Ok(PollResponse::new(messages, after))
    }

    /// Full transcript of one conversation, oldest first.
    pub async fn history(&self, client_id: &str) -> Result<Vec<Message>, HelplineError> {
        let client_id = validate::client_id(client_id)?;
        self.storage.messages_after(Some(client_id), i64::MIN).await
    }

    pub async fn conversations(
        &self,
        session: &AdminSession,
    ) -> Result<Vec<ConversationSummary>, HelplineError> {
        self.authorize(session).await?;
        self.storage.conversation_summaries().await
    }
}
