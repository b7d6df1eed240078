// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use helpline_core::traits::{PluginAdapter, ProviderAdapter};
use helpline_core::types::{AdapterType, CompletionRequest, CompletionResponse, HealthStatus};
use helpline_core::HelplineError;

/// A mock completion provider.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Switching the provider
/// to failing mode makes every call return an upstream error.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every call fails like an exhausted quota.
    pub fn failing() -> Self {
        let provider = Self::new();
        provider.set_failing(true);
        provider
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Number of `complete` calls so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HelplineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelplineError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HelplineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        if self.failing.load(Ordering::SeqCst) {
            return Err(HelplineError::Upstream {
                message: "mock provider: quota exceeded".into(),
                source: None,
            });
        }
        Ok(CompletionResponse {
            text: self.next_response().await,
            model: "mock-model".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "s".into(),
            user: "u".into(),
            max_tokens: 10,
        }
    }

    #[tokio::test]
    async fn replies_in_order_then_default() {
        let provider = MockProvider::with_responses(vec!["one".into(), "two".into()]);
        assert_eq!(provider.complete(request()).await.unwrap().text, "one");
        assert_eq!(provider.complete(request()).await.unwrap().text, "two");
        assert_eq!(provider.complete(request()).await.unwrap().text, "mock response");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn failing_mode_returns_upstream_error() {
        let provider = MockProvider::failing();
        assert!(provider.complete(request()).await.unwrap_err().is_upstream());
        provider.set_failing(false);
        assert!(provider.complete(request()).await.is_ok());
    }
}
