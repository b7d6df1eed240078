// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation to the completion tier.
//!
//! The processor never fails: timeouts, HTTP errors, quota errors and
//! empty completions all produce [`FALLBACK_REPLY`] at
//! [`FALLBACK_CONFIDENCE`].

use std::sync::Arc;
use std::time::Duration;

use helpline_config::model::AiConfig;
use helpline_core::types::CompletionRequest;
use helpline_core::{HelplineError, ProviderAdapter};
use tracing::{debug, warn};

/// Confidence attached to a successful completion. Advisory only.
pub const SUCCESS_CONFIDENCE: f64 = 0.8;
/// Confidence attached to the fallback reply.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

pub const FALLBACK_REPLY: &str = "Üzgünüm, şu anda yanıt veremiyorum. \
Destek ekibimiz mesajınızı gördü ve en kısa sürede size dönüş yapacak.";

pub const DEFAULT_SYSTEM_PROMPT: &str = "Sen bir oyun destek sitesinin müşteri temsilcisisin. \
Yalnızca oyun hesapları, oyun içi altın ve ürün satın alımları, ödemeler, teslimat ve iade \
konularındaki soruları yanıtla. Bu konuların dışındaki sorularda kibarca yalnızca oyun desteği \
verebildiğini söyle. Kısa, net ve Türkçe yanıt ver. Şifre, kart bilgisi veya kişisel veri isteme.";

/// A reply from the completion tier.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalationReply {
    pub response: String,
    pub confidence: f64,
    /// True when the reply is the fixed fallback.
    pub fallback: bool,
}

impl EscalationReply {
    fn fallback() -> Self {
        Self {
            response: FALLBACK_REPLY.to_string(),
            confidence: FALLBACK_CONFIDENCE,
            fallback: true,
        }
    }
}

/// Forwards unmatched user messages to the completion provider.
pub struct EscalationProcessor {
    provider: Option<Arc<dyn ProviderAdapter>>,
    system_prompt: String,
    max_tokens: u32,
    timeout: Duration,
}

impl EscalationProcessor {
    /// `provider = None` disables the tier; every escalation gets the fallback.
    pub fn new(provider: Option<Arc<dyn ProviderAdapter>>, config: &AiConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Overrides the overall deadline of one escalation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Ask the provider to answer `text`. Always returns a reply.
    pub async fn escalate(&self, text: &str) -> EscalationReply {
        match self.try_escalate(text).await {
            Ok(response) => {
                debug!(chars = response.chars().count(), "completion reply received");
                EscalationReply {
                    response,
                    confidence: SUCCESS_CONFIDENCE,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "escalation failed, sending fallback reply");
                helpline_prometheus::record_ai_fallback();
                EscalationReply::fallback()
            }
        }
    }

    async fn try_escalate(&self, text: &str) -> Result<String, HelplineError> {
        let provider = self.provider.as_ref().ok_or_else(|| HelplineError::Upstream {
            message: "completion provider not configured".into(),
            source: None,
        })?;
        let request = CompletionRequest {
            system: self.system_prompt.clone(),
            user: text.to_string(),
            max_tokens: self.max_tokens,
        };
        let response = tokio::time::timeout(self.timeout, provider.complete(request))
            .await
            .map_err(|_| HelplineError::Timeout {
                duration: self.timeout,
            })??;
        let reply = response.text.trim();
        if reply.is_empty() {
            return Err(HelplineError::Upstream {
                message: "completion contained no text".into(),
                source: None,
            });
        }
        Ok(reply.to_string())
    }
}
