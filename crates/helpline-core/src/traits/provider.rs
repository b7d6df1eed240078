// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the text-completion service.

use async_trait::async_trait;

use crate::error::HelplineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// A black-box text-completion service.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Generates a reply for a system + user message pair.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, HelplineError>;
}
