// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin claims on conversations.
//!
//! A takeover silences the automated tiers for one conversation until the
//! admin releases it. Re-claiming an already claimed conversation replaces
//! the holder.

use helpline_core::types::{AdminSession, NewMessage, Role, Takeover, TakeoverStatus};
use helpline_core::{ConversationMode, HelplineError, Message, validate};
use tracing::info;

use crate::SupportAgent;

const TAKEOVER_GREETING: &str =
    "Bir müşteri temsilcisi sohbete katıldı. Size bundan sonra o yardımcı olacak.";
const RELEASE_NOTICE: &str =
    "Müşteri temsilcisi sohbetten ayrıldı. Otomatik asistan tekrar devrede.";

impl SupportAgent {
    /// Claim a conversation for the session's admin and greet the user.
    pub async fn takeover(
        &self,
        session: &AdminSession,
        conversation_id: &str,
    ) -> Result<Message, HelplineError> {
        let session = self.authorize(session).await?;
        let conversation_id = validate::client_id(conversation_id)?;
        let greeting = {
            let _guard = self.locks.acquire(conversation_id).await;
            self.ensure_conversation(conversation_id).await?;
            self.claim(conversation_id, &session.admin_id).await?;
            self.storage
                .append_message(&NewMessage::system(
                    conversation_id,
                    &session.admin_id,
                    TAKEOVER_GREETING,
                ))
                .await?
        };
        info!(conversation_id, admin_id = %session.admin_id, "conversation taken over");
        self.refresh_takeover_gauge().await;
        Ok(greeting)
    }

    /// Send an admin reply. Implicitly claims the conversation.
    pub async fn respond(
        &self,
        session: &AdminSession,
        conversation_id: &str,
        text: &str,
    ) -> Result<Message, HelplineError> {
        let session = self.authorize(session).await?;
        let conversation_id = validate::client_id(conversation_id)?;
        let text = validate::message_text(text)?;
        let reply = {
            let _guard = self.locks.acquire(conversation_id).await;
            self.ensure_conversation(conversation_id).await?;
            if self.mode(conversation_id).await? != ConversationMode::Human {
                self.claim(conversation_id, &session.admin_id).await?;
            }
            let reply = self
                .storage
                .append_message(&NewMessage::admin(conversation_id, &session.admin_id, text))
                .await?;
            self.analytics.record(Role::Admin, reply.timestamp).await?;
            reply
        };
        helpline_prometheus::record_message("admin");
        info!(conversation_id, admin_id = %session.admin_id, "admin replied");
        self.refresh_takeover_gauge().await;
        Ok(reply)
    }

    /// Hand a conversation back to the automated tiers.
    pub async fn release(
        &self,
        session: &AdminSession,
        conversation_id: &str,
    ) -> Result<Message, HelplineError> {
        let session = self.authorize(session).await?;
        let conversation_id = validate::client_id(conversation_id)?;
        let notice = {
            let _guard = self.locks.acquire(conversation_id).await;
            let active = self
                .storage
                .get_takeover(conversation_id)
                .await?
                .filter(|t| t.status == TakeoverStatus::Active)
                .ok_or_else(|| {
                    HelplineError::NotFound(format!("active takeover for {conversation_id}"))
                })?;
            self.storage
                .upsert_takeover(&Takeover {
                    status: TakeoverStatus::Released,
                    timestamp: self.clock.now_ms(),
                    ..active
                })
                .await?;
            self.storage
                .append_message(&NewMessage::system(
                    conversation_id,
                    &session.admin_id,
                    RELEASE_NOTICE,
                ))
                .await?
        };
        info!(conversation_id, admin_id = %session.admin_id, "conversation released");
        self.refresh_takeover_gauge().await;
        Ok(notice)
    }

    async fn ensure_conversation(&self, conversation_id: &str) -> Result<(), HelplineError> {
        if !self.storage.conversation_exists(conversation_id).await? {
            return Err(HelplineError::NotFound(format!(
                "conversation {conversation_id}"
            )));
        }
        Ok(())
    }

    async fn claim(&self, conversation_id: &str, admin_id: &str) -> Result<(), HelplineError> {
        self.storage
            .upsert_takeover(&Takeover {
                conversation_id: conversation_id.to_string(),
                admin_id: admin_id.to_string(),
                timestamp: self.clock.now_ms(),
                status: TakeoverStatus::Active,
            })
            .await
    }
}
