// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the admin push channel.

use async_trait::async_trait;

use crate::error::HelplineError;
use crate::traits::adapter::PluginAdapter;

/// Pushes text to the single configured admin recipient.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    async fn send_text(&self, text: &str) -> Result<(), HelplineError>;
}
