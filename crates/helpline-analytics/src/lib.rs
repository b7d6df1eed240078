// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analytics Aggregator for the Helpline support relay.
//!
//! Responder counters are bucketed by UTC calendar day and incremented by
//! atomic upserts. Period statistics sum the contiguous buckets ending
//! today; the performance report pairs replies with the user message
//! that directly preceded them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use helpline_core::clock::{utc_date, utc_naive_date};
use helpline_core::types::{Message, Role};
use helpline_core::{Clock, HelplineError, StorageAdapter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Reporting window, always ending with the current UTC day.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Number of calendar days the period spans.
    pub fn days(self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Monthly => 30,
        }
    }
}

/// Summed counters over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub period: Period,
    pub from: String,
    pub to: String,
    pub total: u64,
    pub bot: u64,
    pub ai: u64,
    pub admin: u64,
}

/// Reply latency over the trailing 24 hours and today's escalation rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub average_response_ms: f64,
    pub samples: u64,
    pub escalation_rate: f64,
}

pub struct AnalyticsAggregator {
    storage: Arc<dyn StorageAdapter>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsAggregator {
    pub fn new(storage: Arc<dyn StorageAdapter>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Count a message in the UTC day containing `at_ms`. Non-responders are ignored.
    pub async fn record(&self, role: Role, at_ms: i64) -> Result<(), HelplineError> {
        if !role.is_responder() {
            return Ok(());
        }
        let date = utc_date(at_ms);
        self.storage.increment_daily(&date, role).await?;
        debug!(%role, date, "analytics bucket incremented");
        Ok(())
    }

    pub async fn stats_for_period(&self, period: Period) -> Result<PeriodStats, HelplineError> {
        let today = utc_naive_date(self.clock.now_ms());
        let first = today - ChronoDuration::days(period.days() - 1);
        let from = first.format("%Y-%m-%d").to_string();
        let to = today.format("%Y-%m-%d").to_string();

        let mut stats = PeriodStats {
            period,
            from,
            to,
            total: 0,
            bot: 0,
            ai: 0,
            admin: 0,
        };
        for day in self.storage.daily_range(&stats.from, &stats.to).await? {
            stats.total += day.total;
            stats.bot += day.bot;
            stats.ai += day.ai;
            stats.admin += day.admin;
        }
        Ok(stats)
    }

    pub async fn performance(&self) -> Result<PerformanceReport, HelplineError> {
        let now = self.clock.now_ms();
        let recent = self.storage.messages_after(None, now - DAY_MS).await?;
        let (total_ms, samples) = response_times(&recent);

        let today = self.stats_for_period(Period::Daily).await?;
        let escalation_rate = if today.total == 0 {
            0.0
        } else {
            (today.ai + today.admin) as f64 / today.total as f64
        };

        Ok(PerformanceReport {
            average_response_ms: if samples == 0 {
                0.0
            } else {
                total_ms as f64 / samples as f64
            },
            samples,
            escalation_rate,
        })
    }
}

/// Sum of reply delays and the number of pairs, for messages in timestamp order.
///
/// A sample is a non-user message whose immediate predecessor in the same
/// conversation is a user message.
fn response_times(messages: &[Message]) -> (i64, u64) {
    let mut previous: HashMap<&str, &Message> = HashMap::new();
    let mut total = 0i64;
    let mut samples = 0u64;
    for message in messages {
        if let Some(prev) = previous.get(message.client_id.as_str())
            && prev.role == Role::User
            && message.role != Role::User
        {
            total += message.timestamp - prev.timestamp;
            samples += 1;
        }
        previous.insert(message.client_id.as_str(), message);
    }
    (total, samples)
}
