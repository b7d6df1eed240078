// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::HelplineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    CodeRedemption, ConversationSummary, DailyAnalytics, Message, NewMessage, NewPattern, Pattern,
    PendingCode, Role, SessionRecord, Takeover,
};

/// A bounded confidence adjustment applied in one atomic update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceNudge {
    /// Added to the current confidence before clamping.
    pub delta: f64,
    /// 1.0 for a successful use, 0.0 for a failed one.
    pub outcome: f64,
    pub floor: f64,
    pub ceiling: f64,
}

/// Adapter for storage and persistence backends.
///
/// Every mutating operation must be atomic with respect to concurrent
/// callers: implementations never read-modify-write a whole document.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), HelplineError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), HelplineError>;

    // --- Message log ---

    /// Appends a message and assigns it a timestamp strictly greater than
    /// every timestamp already in the store.
    async fn append_message(&self, message: &NewMessage) -> Result<Message, HelplineError>;

    /// Messages with `timestamp > after`, oldest first. `None` spans all clients.
    async fn messages_after(
        &self,
        client_id: Option<&str>,
        after: i64,
    ) -> Result<Vec<Message>, HelplineError>;

    /// True when the client has at least one message.
    async fn conversation_exists(&self, client_id: &str) -> Result<bool, HelplineError>;

    /// One summary per client that has at least one message.
    async fn conversation_summaries(&self) -> Result<Vec<ConversationSummary>, HelplineError>;

    // --- Pattern set ---

    async fn insert_pattern(&self, pattern: &NewPattern) -> Result<Pattern, HelplineError>;

    /// All patterns in insertion order.
    async fn list_patterns(&self) -> Result<Vec<Pattern>, HelplineError>;

    /// Increments `usage` of a matched pattern.
    async fn record_pattern_match(&self, id: i64) -> Result<(), HelplineError>;

    /// Increments `usage`, nudges `confidence` and folds `outcome` into `success_rate`.
    async fn apply_pattern_feedback(
        &self,
        id: i64,
        nudge: ConfidenceNudge,
    ) -> Result<Pattern, HelplineError>;

    // --- Daily analytics ---

    /// Creates the day's bucket if absent and increments `total` and the role counter.
    async fn increment_daily(&self, date: &str, role: Role) -> Result<(), HelplineError>;

    /// Buckets with `from <= date <= to`, oldest first.
    async fn daily_range(&self, from: &str, to: &str)
    -> Result<Vec<DailyAnalytics>, HelplineError>;

    // --- Takeovers ---

    /// Inserts or replaces the takeover record of a conversation.
    async fn upsert_takeover(&self, takeover: &Takeover) -> Result<(), HelplineError>;

    async fn get_takeover(&self, conversation_id: &str)
    -> Result<Option<Takeover>, HelplineError>;

    async fn count_active_takeovers(&self) -> Result<u64, HelplineError>;

    // --- Admin credentials ---

    /// Stores a pending code, replacing any existing one for the identity.
    async fn put_code(&self, code: &PendingCode) -> Result<(), HelplineError>;

    async fn get_code(&self, identity: &str) -> Result<Option<PendingCode>, HelplineError>;

    /// Atomically checks `code` for `identity` at `now`.
    ///
    /// A match or an expired code deletes the row. A mismatch counts an
    /// attempt and deletes the row once `max_attempts` is reached.
    async fn redeem_code(
        &self,
        identity: &str,
        code: &str,
        now: i64,
        max_attempts: u32,
    ) -> Result<CodeRedemption, HelplineError>;

    async fn delete_code(&self, identity: &str) -> Result<(), HelplineError>;

    async fn put_session(&self, session: &SessionRecord) -> Result<(), HelplineError>;

    async fn get_session(&self, token_hash: &str)
    -> Result<Option<SessionRecord>, HelplineError>;

    async fn delete_session(&self, token_hash: &str) -> Result<(), HelplineError>;

    /// Deletes codes and sessions expired at `now`; returns how many rows went.
    async fn purge_expired(&self, now: i64) -> Result<u64, HelplineError>;
}
