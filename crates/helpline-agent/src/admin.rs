// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-checked admin operations on analytics and the pattern set.

use helpline_analytics::{Period, PerformanceReport, PeriodStats};
use helpline_core::types::AdminSession;
use helpline_core::{Feedback, HelplineError, Pattern};
use tracing::info;

use crate::SupportAgent;

impl SupportAgent {
    pub async fn stats(
        &self,
        session: &AdminSession,
        period: Period,
    ) -> Result<PeriodStats, HelplineError> {
        self.authorize(session).await?;
        self.analytics.stats_for_period(period).await
    }

    pub async fn performance(
        &self,
        session: &AdminSession,
    ) -> Result<PerformanceReport, HelplineError> {
        self.authorize(session).await?;
        self.analytics.performance().await
    }

    pub async fn list_patterns(
        &self,
        session: &AdminSession,
    ) -> Result<Vec<Pattern>, HelplineError> {
        self.authorize(session).await?;
        self.storage.list_patterns().await
    }

    /// Add a pattern to the knowledge base.
    pub async fn train_pattern(
        &self,
        session: &AdminSession,
        keywords: &[String],
        response: &str,
        confidence: Option<f64>,
    ) -> Result<Pattern, HelplineError> {
        let session = self.authorize(session).await?;
        let pattern =
            helpline_matcher::train_pattern(self.storage.as_ref(), keywords, response, confidence)
                .await?;
        info!(pattern_id = pattern.id, admin_id = %session.admin_id, "pattern trained");
        Ok(pattern)
    }

    /// Widget feedback on a bot reply. `None` for neutral feedback.
    pub async fn pattern_feedback(
        &self,
        pattern_id: i64,
        feedback: Feedback,
    ) -> Result<Option<Pattern>, HelplineError> {
        helpline_matcher::record_usage(self.storage.as_ref(), pattern_id, feedback).await
    }
}
