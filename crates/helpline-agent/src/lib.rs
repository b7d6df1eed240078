// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for the Helpline support relay.
//!
//! The [`SupportAgent`] is the central coordinator that:
//! - Routes each user message to the pattern bot, the completion tier, or
//!   nobody when a human holds the conversation
//! - Lets an authenticated admin take over, answer and release conversations
//! - Serves the polling protocol for widgets and the admin console
//! - Pushes notifications to the admin channel

pub mod admin;
pub mod locks;
pub mod router;
pub mod shutdown;
pub mod sync;
pub mod takeover;

use std::sync::Arc;
use std::time::Duration;

use helpline_ai::EscalationProcessor;
use helpline_analytics::AnalyticsAggregator;
use helpline_auth::AdminSessionAuthority;
use helpline_config::model::TelegramConfig;
use helpline_core::types::AdminSession;
use helpline_core::{ChannelAdapter, Clock, HelplineError, StorageAdapter};
use helpline_matcher::KnowledgeMatcher;
use tracing::{debug, warn};

use crate::locks::ConversationLocks;

pub use router::UserReply;
pub use sync::PollResponse;

/// Notification behavior toward the admin channel.
#[derive(Debug, Clone, Copy)]
pub struct NotifySettings {
    /// Upper bound on one push.
    pub send_timeout: Duration,
    /// Also push user messages the pattern bot answered.
    pub notify_user_messages: bool,
}

impl From<&TelegramConfig> for NotifySettings {
    fn from(config: &TelegramConfig) -> Self {
        Self {
            send_timeout: Duration::from_secs(config.send_timeout_secs),
            notify_user_messages: config.notify_user_messages,
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self::from(&TelegramConfig::default())
    }
}

/// Owns every collaborator of the conversation engine.
pub struct SupportAgent {
    storage: Arc<dyn StorageAdapter>,
    auth: Arc<AdminSessionAuthority>,
    matcher: KnowledgeMatcher,
    escalation: EscalationProcessor,
    analytics: AnalyticsAggregator,
    notifier: Arc<dyn ChannelAdapter>,
    clock: Arc<dyn Clock>,
    locks: ConversationLocks,
    notify: NotifySettings,
}

impl SupportAgent {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        auth: Arc<AdminSessionAuthority>,
        matcher: KnowledgeMatcher,
        escalation: EscalationProcessor,
        notifier: Arc<dyn ChannelAdapter>,
        clock: Arc<dyn Clock>,
        notify: NotifySettings,
    ) -> Self {
        let analytics = AnalyticsAggregator::new(storage.clone(), clock.clone());
        Self {
            storage,
            auth,
            matcher,
            escalation,
            analytics,
            notifier,
            clock,
            locks: ConversationLocks::new(),
            notify,
        }
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    pub fn auth(&self) -> &Arc<AdminSessionAuthority> {
        &self.auth
    }

    pub fn analytics(&self) -> &AnalyticsAggregator {
        &self.analytics
    }

    pub fn locks(&self) -> &ConversationLocks {
        &self.locks
    }

    /// Re-validate a session against the store. Admin operations fail closed.
    pub async fn authorize(&self, session: &AdminSession) -> Result<AdminSession, HelplineError> {
        self.auth.verify_session(&session.token).await
    }

    /// Push `text` to the admin channel. Failures and timeouts are logged and dropped.
    pub(crate) async fn notify_admin(&self, text: &str) {
        match tokio::time::timeout(self.notify.send_timeout, self.notifier.send_text(text)).await {
            Ok(Ok(())) => debug!("admin notified"),
            Ok(Err(e)) => warn!(error = %e, "admin notification failed"),
            Err(_) => warn!(timeout = ?self.notify.send_timeout, "admin notification timed out"),
        }
    }

    /// Refresh the active-takeover gauge from the store.
    pub(crate) async fn refresh_takeover_gauge(&self) {
        match self.storage.count_active_takeovers().await {
            Ok(count) => helpline_prometheus::set_active_takeovers(count),
            Err(e) => warn!(error = %e, "failed to count active takeovers"),
        }
    }
}
