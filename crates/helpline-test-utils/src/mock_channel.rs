// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock push channel for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` and captures every pushed
//! text for assertion in tests. It can be switched to fail every send.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use helpline_core::traits::{ChannelAdapter, PluginAdapter};
use helpline_core::types::{AdapterType, HealthStatus};
use helpline_core::HelplineError;

/// A mock admin push channel.
pub struct MockChannel {
    sent: Arc<Mutex<Vec<String>>>,
    failing: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// A channel whose every send fails.
    pub fn failing() -> Self {
        let channel = Self::new();
        channel.set_failing(true);
        channel
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every text successfully pushed so far.
    pub async fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// The six-digit code inside the most recent push, if any.
    pub async fn last_code(&self) -> Option<String> {
        let sent = self.sent.lock().await;
        sent.iter().rev().find_map(|text| {
            text.split(|c: char| !c.is_ascii_digit())
                .find(|run| run.len() == 6)
                .map(str::to_string)
        })
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HelplineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelplineError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn send_text(&self, text: &str) -> Result<(), HelplineError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HelplineError::Upstream {
                message: "mock channel: send failed".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_sent_text_and_extracts_code() {
        let channel = MockChannel::new();
        channel.send_text("hello").await.unwrap();
        channel.send_text("Giriş kodunuz: 042917 (5 dk)").await.unwrap();
        assert_eq!(channel.sent_count().await, 2);
        assert_eq!(channel.last_code().await.as_deref(), Some("042917"));
    }

    #[tokio::test]
    async fn failing_channel_records_nothing() {
        let channel = MockChannel::failing();
        assert!(channel.send_text("x").await.is_err());
        assert_eq!(channel.sent_count().await, 0);
    }
}
