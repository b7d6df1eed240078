// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use helpline_config::model::StorageConfig;
use helpline_core::traits::ConfidenceNudge;
use helpline_core::types::{
    CodeRedemption, ConversationSummary, DailyAnalytics, Message, NewMessage, NewPattern, Pattern,
    PendingCode, Role, SessionRecord, Takeover,
};
use helpline_core::{
    AdapterType, Clock, HealthStatus, HelplineError, PluginAdapter, StorageAdapter, SystemClock,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`]. Message timestamps are read from the
/// injected [`Clock`].
pub struct SqliteStorage {
    config: StorageConfig,
    clock: Arc<dyn Clock>,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage reading time from the system clock.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: StorageConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            db: OnceCell::new(),
        }
    }

    /// An already-initialized store backed by a private in-memory database.
    pub async fn in_memory(clock: Arc<dyn Clock>) -> Result<Self, HelplineError> {
        let storage = Self::with_clock(
            StorageConfig {
                database_path: ":memory:".into(),
                wal_mode: false,
            },
            clock,
        );
        let db = Database::open_in_memory().await?;
        storage
            .db
            .set(db)
            .map_err(|_| HelplineError::Internal("storage already initialized".into()))?;
        Ok(storage)
    }

    fn db(&self) -> Result<&Database, HelplineError> {
        self.db.get().ok_or_else(|| HelplineError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), HelplineError> {
        if !self.config.wal_mode {
            return Ok(());
        }
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HelplineError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelplineError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HelplineError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HelplineError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HelplineError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }

    // --- Message log ---

    async fn append_message(&self, message: &NewMessage) -> Result<Message, HelplineError> {
        queries::messages::append_message(self.db()?, message, self.clock.now_ms()).await
    }

    async fn messages_after(
        &self,
        client_id: Option<&str>,
        after: i64,
    ) -> Result<Vec<Message>, HelplineError> {
        queries::messages::messages_after(self.db()?, client_id, after).await
    }

    async fn conversation_exists(&self, client_id: &str) -> Result<bool, HelplineError> {
        queries::messages::conversation_exists(self.db()?, client_id).await
    }

    async fn conversation_summaries(&self) -> Result<Vec<ConversationSummary>, HelplineError> {
        queries::messages::conversation_summaries(self.db()?).await
    }

    // --- Pattern set ---

    async fn insert_pattern(&self, pattern: &NewPattern) -> Result<Pattern, HelplineError> {
        queries::patterns::insert_pattern(self.db()?, pattern).await
    }

    async fn list_patterns(&self) -> Result<Vec<Pattern>, HelplineError> {
        queries::patterns::list_patterns(self.db()?).await
    }

    async fn record_pattern_match(&self, id: i64) -> Result<(), HelplineError> {
        queries::patterns::record_match(self.db()?, id).await
    }

    async fn apply_pattern_feedback(
        &self,
        id: i64,
        nudge: ConfidenceNudge,
    ) -> Result<Pattern, HelplineError> {
        queries::patterns::apply_feedback(self.db()?, id, nudge).await
    }

    // --- Daily analytics ---

    async fn increment_daily(&self, date: &str, role: Role) -> Result<(), HelplineError> {
        queries::analytics::increment_daily(self.db()?, date, role).await
    }

    async fn daily_range(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<DailyAnalytics>, HelplineError> {
        queries::analytics::daily_range(self.db()?, from, to).await
    }

    // --- Takeovers ---

    async fn upsert_takeover(&self, takeover: &Takeover) -> Result<(), HelplineError> {
        queries::takeovers::upsert_takeover(self.db()?, takeover).await
    }

    async fn get_takeover(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Takeover>, HelplineError> {
        queries::takeovers::get_takeover(self.db()?, conversation_id).await
    }

    async fn count_active_takeovers(&self) -> Result<u64, HelplineError> {
        queries::takeovers::count_active(self.db()?).await
    }

    // --- Admin credentials ---

    async fn put_code(&self, code: &PendingCode) -> Result<(), HelplineError> {
        queries::credentials::put_code(self.db()?, code).await
    }

    async fn get_code(&self, identity: &str) -> Result<Option<PendingCode>, HelplineError> {
        queries::credentials::get_code(self.db()?, identity).await
    }

    async fn redeem_code(
        &self,
        identity: &str,
        code: &str,
        now: i64,
        max_attempts: u32,
    ) -> Result<CodeRedemption, HelplineError> {
        queries::credentials::redeem_code(self.db()?, identity, code, now, max_attempts).await
    }

    async fn delete_code(&self, identity: &str) -> Result<(), HelplineError> {
        queries::credentials::delete_code(self.db()?, identity).await
    }

    async fn put_session(&self, session: &SessionRecord) -> Result<(), HelplineError> {
        queries::credentials::put_session(self.db()?, session).await
    }

    async fn get_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, HelplineError> {
        queries::credentials::get_session(self.db()?, token_hash).await
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), HelplineError> {
        queries::credentials::delete_session(self.db()?, token_hash).await
    }

    async fn purge_expired(&self, now: i64) -> Result<u64, HelplineError> {
        queries::credentials::purge_expired(self.db()?, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpline_core::ManualClock;

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let storage = SqliteStorage::new(StorageConfig::default());
        assert!(storage.list_patterns().await.is_err());
        assert!(storage.shutdown().await.is_ok());
    }

    #[tokio::test]
    async fn initialize_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("h.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn timestamps_stay_strictly_increasing_when_clock_stalls() {
        let clock = Arc::new(ManualClock::new(1_000));
        let storage = SqliteStorage::in_memory(clock.clone()).await.unwrap();

        let a = storage.append_message(&NewMessage::user("c1", "a")).await.unwrap();
        let b = storage.append_message(&NewMessage::user("c2", "b")).await.unwrap();
        clock.set(500);
        let c = storage.append_message(&NewMessage::user("c1", "c")).await.unwrap();

        assert_eq!(a.timestamp, 1_000);
        assert_eq!(b.timestamp, 1_001);
        assert_eq!(c.timestamp, 1_002);

        let tail = storage.messages_after(Some("c1"), a.timestamp).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].content, "c");
    }

    #[tokio::test]
    async fn concurrent_appends_get_distinct_timestamps() {
        let clock = Arc::new(ManualClock::new(42));
        let storage = Arc::new(SqliteStorage::in_memory(clock).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..20 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .append_message(&NewMessage::user(&format!("c{}", i % 3), "hi"))
                    .await
                    .unwrap()
                    .timestamp
            }));
        }
        let mut stamps = Vec::new();
        for h in handles {
            stamps.push(h.await.unwrap());
        }
        stamps.sort_unstable();
        stamps.dedup();
        assert_eq!(stamps.len(), 20);
    }
}
