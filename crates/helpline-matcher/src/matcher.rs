// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword scoring over the pattern set.
//!
//! A pattern scores the fraction of its keywords found as case-insensitive
//! substrings of the message, weighted by the pattern's own confidence.
//! Case folding follows Turkish rules: `I` lowers to `ı` and `İ` to `i`.
//! Matching is pure: it never touches storage.

use helpline_config::model::MatcherConfig;
use helpline_core::types::Pattern;

/// Outcome of matching one message against the pattern set.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Best-scoring pattern, if any keyword overlapped at all.
    pub matched: Option<Pattern>,
    /// Weighted confidence of `matched`, 0.0 when nothing overlapped.
    pub confidence: f64,
    /// True when `confidence` is below the threshold.
    pub should_escalate: bool,
}

/// Scores messages against patterns and decides whether to escalate.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeMatcher {
    threshold: f64,
}

impl KnowledgeMatcher {
    /// Default escalation threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.7;

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Pick the highest weighted pattern. Ties keep the earlier pattern.
    pub fn match_message(&self, text: &str, patterns: &[Pattern]) -> MatchResult {
        let lower = fold_case(text);
        let mut best: Option<(&Pattern, f64)> = None;

        for pattern in patterns {
            let weighted = keyword_score(&lower, &pattern.keywords) * pattern.confidence;
            if weighted <= 0.0 {
                continue;
            }
            match best {
                Some((_, top)) if weighted <= top => {}
                _ => best = Some((pattern, weighted)),
            }
        }

        let confidence = best.map(|(_, c)| c).unwrap_or(0.0);
        MatchResult {
            matched: best.map(|(p, _)| p.clone()),
            confidence,
            should_escalate: confidence < self.threshold,
        }
    }
}

impl Default for KnowledgeMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

/// Lowercase with the Turkish dotted/dotless `i` pairs.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            'I' => 'ı'.to_lowercase(),
            'İ' => 'i'.to_lowercase(),
            other => other.to_lowercase(),
        })
        .collect()
}

/// Fraction of `keywords` contained in the already-folded `text`.
fn keyword_score(text: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let hits = keywords
        .iter()
        .filter(|k| text.contains(fold_case(k).as_str()))
        .count();
    hits as f64 / keywords.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(id: i64, keywords: &[&str], response: &str, confidence: f64) -> Pattern {
        Pattern {
            id,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            response: response.into(),
            confidence,
            usage: 0,
            success_rate: 0.0,
        }
    }

    fn gold() -> Vec<Pattern> {
        vec![pattern(1, &["altın", "fiyat"], "R1", 0.8)]
    }

    #[test]
    fn full_keyword_hit_is_confident() {
        let result = KnowledgeMatcher::default().match_message("altın fiyat nedir", &gold());
        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert!(!result.should_escalate);
        assert_eq!(result.matched.unwrap().response, "R1");
    }

    #[test]
    fn no_overlap_escalates_with_zero_confidence() {
        let result = KnowledgeMatcher::default().match_message("kargo ne zaman gelir", &gold());
        assert_eq!(result.confidence, 0.0);
        assert!(result.should_escalate);
        assert!(result.matched.is_none());
    }

    #[test]
    fn empty_pattern_set_escalates() {
        let result = KnowledgeMatcher::default().match_message("merhaba", &[]);
        assert_eq!(result.confidence, 0.0);
        assert!(result.should_escalate);
    }

    #[test]
    fn partial_hit_is_weighted() {
        let result = KnowledgeMatcher::default().match_message("Altın lazım", &gold());
        assert!((result.confidence - 0.4).abs() < 1e-9);
        assert!(result.should_escalate);
        assert_eq!(result.matched.unwrap().id, 1);
    }

    #[test]
    fn turkish_capitals_fold_to_their_own_lowercase() {
        let result = KnowledgeMatcher::default().match_message("ALTIN FİYAT NEDİR", &gold());
        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert!(!result.should_escalate);

        let patterns = vec![pattern(1, &["İade", "Kargo"], "R", 1.0)];
        let result = KnowledgeMatcher::default().match_message("iade ve kargo", &patterns);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fold_case_maps_dotted_and_dotless_i() {
        assert_eq!(fold_case("ALTIN"), "altın");
        assert_eq!(fold_case("FİYAT"), "fiyat");
        assert_eq!(fold_case("Şifre ÇÖZÜM"), "şifre çözüm");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let patterns = vec![
            pattern(1, &["hesap"], "first", 0.9),
            pattern(2, &["hesap"], "second", 0.9),
        ];
        let result = KnowledgeMatcher::default().match_message("hesap açtım", &patterns);
        assert_eq!(result.matched.unwrap().id, 1);
    }

    #[test]
    fn higher_weight_wins_over_order() {
        let patterns = vec![
            pattern(1, &["hesap", "şifre"], "half", 0.9),
            pattern(2, &["hesap"], "full", 0.75),
        ];
        let result = KnowledgeMatcher::default().match_message("hesap sorunu", &patterns);
        assert_eq!(result.matched.unwrap().id, 2);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        assert!(!result.should_escalate);
    }

    #[test]
    fn matching_is_deterministic() {
        let patterns = gold();
        let matcher = KnowledgeMatcher::new(0.5);
        let first = matcher.match_message("altın fiyatı", &patterns);
        for _ in 0..10 {
            assert_eq!(matcher.match_message("altın fiyatı", &patterns), first);
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let result = KnowledgeMatcher::new(0.8).match_message("altın fiyat", &gold());
        assert!(!result.should_escalate);
    }
}
