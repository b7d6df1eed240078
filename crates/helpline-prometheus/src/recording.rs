// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder every call
//! is a no-op, so library crates record unconditionally.

use std::time::Duration;

use metrics::{describe_counter, describe_gauge, describe_histogram};

/// Register all Helpline metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("helpline_messages_total", "Messages appended, by role");
    describe_counter!(
        "helpline_escalations_total",
        "User messages the matcher escalated to the AI tier"
    );
    describe_counter!(
        "helpline_ai_fallbacks_total",
        "AI escalations answered with the fallback apology"
    );
    describe_histogram!(
        "helpline_reply_latency_seconds",
        "Time from user message to automated reply"
    );
    describe_gauge!(
        "helpline_active_takeovers",
        "Conversations currently under human takeover"
    );
}

/// Record an appended message.
pub fn record_message(role: &str) {
    metrics::counter!("helpline_messages_total", "role" => role.to_string()).increment(1);
}

pub fn record_escalation() {
    metrics::counter!("helpline_escalations_total").increment(1);
}

pub fn record_ai_fallback() {
    metrics::counter!("helpline_ai_fallbacks_total").increment(1);
}

/// Record how long an automated reply took.
pub fn record_reply_latency(elapsed: Duration) {
    metrics::histogram!("helpline_reply_latency_seconds").record(elapsed.as_secs_f64());
}

pub fn set_active_takeovers(count: u64) {
    metrics::gauge!("helpline_active_takeovers").set(count as f64);
}
