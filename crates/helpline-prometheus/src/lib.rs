// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for the Helpline support relay.
//!
//! Uses the metrics-rs facade with the Prometheus exporter.
//! Metrics are rendered as Prometheus text format via [`PrometheusAdapter::render`],
//! which the gateway serves at `/metrics`.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use helpline_core::types::{AdapterType, HealthStatus};
use helpline_core::{HelplineError, PluginAdapter};

pub use recording::{
    record_ai_fallback, record_escalation, record_message, record_reply_latency,
    register_metrics, set_active_takeovers,
};

/// Prometheus metrics adapter.
///
/// Installs the Prometheus recorder and exposes a handle for rendering
/// metrics in Prometheus text format.
#[derive(Clone)]
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn new() -> Result<Self, HelplineError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            HelplineError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// A handle backed by a recorder that is NOT installed globally.
    ///
    /// Renders nothing the facade records; used where a process-wide
    /// recorder already exists or is unwanted.
    pub fn detached() -> Self {
        Self {
            handle: PrometheusBuilder::new().build_recorder().handle(),
        }
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, HelplineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelplineError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_helpers_render_through_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_message("bot");
            record_message("bot");
            record_escalation();
            set_active_takeovers(3);
        });
        let text = handle.render();
        assert!(text.contains("helpline_messages_total{role=\"bot\"} 2"), "{text}");
        assert!(text.contains("helpline_escalations_total 1"), "{text}");
        assert!(text.contains("helpline_active_takeovers 3"), "{text}");
    }

    #[test]
    fn detached_adapter_renders() {
        let adapter = PrometheusAdapter::detached();
        assert_eq!(adapter.name(), "prometheus");
        let _ = adapter.render();
    }
}
