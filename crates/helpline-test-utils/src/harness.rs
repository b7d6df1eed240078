// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete `SupportAgent` with mock adapters,
//! a temp SQLite database and a manual clock. Time only moves when a test
//! advances it, so expiry and analytics buckets are deterministic.

use std::sync::Arc;
use std::time::Duration;

use helpline_agent::{NotifySettings, SupportAgent};
use helpline_ai::EscalationProcessor;
use helpline_auth::AdminSessionAuthority;
use helpline_config::model::{AdminConfig, AiConfig, StorageConfig};
use helpline_core::types::AdminSession;
use helpline_core::{
    ChannelAdapter, Clock, HelplineError, ManualClock, ProviderAdapter, StorageAdapter,
};
use helpline_matcher::KnowledgeMatcher;
use helpline_storage::SqliteStorage;

use crate::mock_channel::MockChannel;
use crate::mock_provider::MockProvider;

/// 2026-03-10T12:00:00Z.
pub const DEFAULT_START_MS: i64 = 1_773_144_000_000;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    provider_enabled: bool,
    provider_failing: bool,
    seed_defaults: bool,
    threshold: f64,
    start_ms: i64,
    notify_user_messages: bool,
    admin: AdminConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            provider_enabled: true,
            provider_failing: false,
            seed_defaults: true,
            threshold: KnowledgeMatcher::DEFAULT_THRESHOLD,
            start_ms: DEFAULT_START_MS,
            notify_user_messages: false,
            admin: AdminConfig::default(),
        }
    }

    /// Set mock provider replies.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Make every completion call fail.
    pub fn with_failing_provider(mut self) -> Self {
        self.provider_failing = true;
        self
    }

    /// Run with no completion provider configured at all.
    pub fn without_provider(mut self) -> Self {
        self.provider_enabled = false;
        self
    }

    /// Start with an empty pattern set.
    pub fn without_default_patterns(mut self) -> Self {
        self.seed_defaults = false;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_start_ms(mut self, start_ms: i64) -> Self {
        self.start_ms = start_ms;
        self
    }

    pub fn with_notify_user_messages(mut self) -> Self {
        self.notify_user_messages = true;
        self
    }

    pub fn with_admin_config(mut self, admin: AdminConfig) -> Self {
        self.admin = admin;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, HelplineError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HelplineError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let clock = Arc::new(ManualClock::new(self.start_ms));
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let storage = SqliteStorage::with_clock(
            StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                wal_mode: true,
            },
            dyn_clock.clone(),
        );
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        if self.seed_defaults {
            helpline_matcher::seed_if_empty(storage.as_ref()).await?;
        }

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        mock_provider.set_failing(self.provider_failing);
        let mock_channel = Arc::new(MockChannel::new());

        let send_timeout = Duration::from_secs(2);
        let auth = Arc::new(AdminSessionAuthority::new(
            storage.clone(),
            mock_channel.clone() as Arc<dyn ChannelAdapter>,
            dyn_clock.clone(),
            self.admin,
            send_timeout,
        ));

        let provider = self
            .provider_enabled
            .then(|| mock_provider.clone() as Arc<dyn ProviderAdapter>);
        let escalation = EscalationProcessor::new(provider, &AiConfig::default())
            .with_timeout(Duration::from_secs(2));

        let agent = Arc::new(SupportAgent::new(
            storage.clone(),
            auth.clone(),
            KnowledgeMatcher::new(self.threshold),
            escalation,
            mock_channel.clone(),
            dyn_clock,
            NotifySettings {
                send_timeout,
                notify_user_messages: self.notify_user_messages,
            },
        ));

        Ok(TestHarness {
            clock,
            storage,
            mock_provider,
            mock_channel,
            auth,
            agent,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// Drives every timestamp and expiry check.
    pub clock: Arc<ManualClock>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    pub mock_provider: Arc<MockProvider>,
    /// Captures admin pushes, login codes included.
    pub mock_channel: Arc<MockChannel>,
    pub auth: Arc<AdminSessionAuthority>,
    pub agent: Arc<SupportAgent>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default patterns and a working mock provider.
    pub async fn new() -> Result<Self, HelplineError> {
        Self::builder().build().await
    }

    /// Run the code login flow through the mock channel and return the session.
    pub async fn login(&self) -> Result<AdminSession, HelplineError> {
        let identity = self.auth.admin_identity().to_string();
        if !self.auth.request_code(&identity).await? {
            return Err(HelplineError::Internal("login code push failed".into()));
        }
        let code = self
            .mock_channel
            .last_code()
            .await
            .ok_or_else(|| HelplineError::Internal("no login code was pushed".into()))?;
        self.mock_channel.clear_sent().await;
        self.auth.verify_code(&identity, &code).await
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}
