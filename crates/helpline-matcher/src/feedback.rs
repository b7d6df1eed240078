// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage tracking and confidence feedback for stored patterns.

use helpline_core::traits::ConfidenceNudge;
use helpline_core::types::{Feedback, NewPattern, Pattern};
use helpline_core::{HelplineError, StorageAdapter};
use tracing::{debug, info};

use crate::matcher::fold_case;

/// Confidence moves by this much per rated use.
pub const CONFIDENCE_STEP: f64 = 0.05;
pub const CONFIDENCE_FLOOR: f64 = 0.1;
pub const CONFIDENCE_CEILING: f64 = 1.0;
/// Confidence given to admin-trained patterns that omit one.
pub const DEFAULT_TRAINED_CONFIDENCE: f64 = 0.8;

/// The storage update a piece of feedback maps to. `None` for neutral.
pub fn nudge_for(feedback: Feedback) -> Option<ConfidenceNudge> {
    let (delta, outcome) = match feedback {
        Feedback::Positive => (CONFIDENCE_STEP, 1.0),
        Feedback::Negative => (-CONFIDENCE_STEP, 0.0),
        Feedback::Neutral => return None,
    };
    Some(ConfidenceNudge {
        delta,
        outcome,
        floor: CONFIDENCE_FLOOR,
        ceiling: CONFIDENCE_CEILING,
    })
}

/// Apply user feedback to a pattern. Neutral feedback changes nothing.
pub async fn record_usage(
    storage: &dyn StorageAdapter,
    pattern_id: i64,
    feedback: Feedback,
) -> Result<Option<Pattern>, HelplineError> {
    let Some(nudge) = nudge_for(feedback) else {
        debug!(pattern_id, "neutral feedback ignored");
        return Ok(None);
    };
    let updated = storage.apply_pattern_feedback(pattern_id, nudge).await?;
    debug!(
        pattern_id,
        %feedback,
        confidence = updated.confidence,
        success_rate = updated.success_rate,
        "pattern feedback applied"
    );
    Ok(Some(updated))
}

/// Count a bot answer against the pattern that produced it.
pub async fn record_match(storage: &dyn StorageAdapter, pattern_id: i64) -> Result<(), HelplineError> {
    storage.record_pattern_match(pattern_id).await
}

/// Validate and store an admin-trained pattern.
///
/// Keywords are trimmed and case-folded; blanks and duplicates are dropped.
pub async fn train_pattern(
    storage: &dyn StorageAdapter,
    keywords: &[String],
    response: &str,
    confidence: Option<f64>,
) -> Result<Pattern, HelplineError> {
    let mut cleaned: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let k = fold_case(keyword.trim());
        if !k.is_empty() && !cleaned.contains(&k) {
            cleaned.push(k);
        }
    }
    if cleaned.is_empty() {
        return Err(HelplineError::validation("keywords", "at least one keyword is required"));
    }
    let response = response.trim();
    if response.is_empty() {
        return Err(HelplineError::validation("response", "response must not be empty"));
    }
    let confidence = confidence.unwrap_or(DEFAULT_TRAINED_CONFIDENCE);
    if !(0.0..=1.0).contains(&confidence) {
        return Err(HelplineError::validation(
            "confidence",
            "confidence must be between 0.0 and 1.0",
        ));
    }

    let pattern = storage
        .insert_pattern(&NewPattern {
            keywords: cleaned,
            response: response.to_string(),
            confidence,
        })
        .await?;
    info!(pattern_id = pattern.id, keywords = ?pattern.keywords, "pattern trained");
    Ok(pattern)
}
