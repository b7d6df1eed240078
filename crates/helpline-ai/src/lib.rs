// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion tier of the Helpline support relay.
//!
//! This crate implements [`ProviderAdapter`] for OpenAI-compatible chat
//! completions endpoints and the [`EscalationProcessor`] that turns any
//! provider failure into a fixed fallback reply.

pub mod client;
pub mod escalation;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use helpline_config::model::AiConfig;
use helpline_core::error::HelplineError;
use helpline_core::traits::{PluginAdapter, ProviderAdapter};
use helpline_core::types::{AdapterType, CompletionRequest, CompletionResponse, HealthStatus};
use tracing::info;

use crate::client::ChatClient;
use crate::types::{ChatMessage, ChatRequest};

pub use escalation::{EscalationProcessor, EscalationReply};

/// OpenAI-compatible provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiCompatProvider {
    client: ChatClient,
    model: String,
}

impl OpenAiCompatProvider {
    /// Creates a provider from the `[ai]` configuration section.
    pub fn new(config: &AiConfig) -> Result<Self, HelplineError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = ChatClient::new(
            &api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = %config.model, base_url = %config.base_url, "completion provider initialized");
        Ok(Self::with_client(client, config.model.clone()))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: ChatClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
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
impl ProviderAdapter for OpenAiCompatProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HelplineError> {
        let api_request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(&request.system),
                ChatMessage::user(&request.user),
            ],
            max_tokens: request.max_tokens,
            temperature: Some(0.3),
        };
        let response = self.client.complete(&api_request).await?;
        let text = response
            .first_text()
            .ok_or_else(|| HelplineError::Upstream {
                message: "completion contained no text".into(),
                source: None,
            })?
            .to_string();
        Ok(CompletionResponse {
            text,
            model: response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

/// Resolves the API key from config, falling back to the environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, HelplineError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY").map_err(|_| {
        HelplineError::Config(
            "completion API key not found. Set ai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )
    })
}
