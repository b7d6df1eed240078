// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matcher behavior against a real SQLite pattern set.

use std::sync::Arc;

use helpline_core::types::{Feedback, NewPattern};
use helpline_core::{HelplineError, ManualClock, StorageAdapter};
use helpline_matcher::{KnowledgeMatcher, record_match, record_usage, seed_if_empty, train_pattern};
use helpline_storage::SqliteStorage;
use proptest::prelude::*;

async fn storage() -> SqliteStorage {
    SqliteStorage::in_memory(Arc::new(ManualClock::new(0)))
        .await
        .unwrap()
}

#[tokio::test]
async fn seeding_only_happens_once() {
    let storage = storage().await;
    let first = seed_if_empty(&storage).await.unwrap();
    assert!(first > 0);
    assert_eq!(seed_if_empty(&storage).await.unwrap(), 0);
    assert_eq!(storage.list_patterns().await.unwrap().len(), first);
}

#[tokio::test]
async fn seeded_gold_pattern_answers_gold_question() {
    let storage = storage().await;
    seed_if_empty(&storage).await.unwrap();
    let patterns = storage.list_patterns().await.unwrap();

    let result = KnowledgeMatcher::default().match_message("altın fiyat nedir", &patterns);
    assert!(!result.should_escalate);
    let matched = result.matched.unwrap();
    assert!(matched.keywords.contains(&"altın".to_string()));

    record_match(&storage, matched.id).await.unwrap();
    let after = storage.list_patterns().await.unwrap();
    let gold = after.iter().find(|p| p.id == matched.id).unwrap();
    assert_eq!(gold.usage, 1);
}

#[tokio::test]
async fn neutral_feedback_is_a_no_op() {
    let storage = storage().await;
    let p = train_pattern(&storage, &["kargo".into()], "R2", None)
        .await
        .unwrap();
    assert!(record_usage(&storage, p.id, Feedback::Neutral).await.unwrap().is_none());
    let stored = &storage.list_patterns().await.unwrap()[0];
    assert_eq!(stored.usage, 0);
    assert_eq!(stored.confidence, 0.8);
}

#[tokio::test]
async fn trained_turkish_capitals_match_lowercase_questions() {
    let storage = storage().await;
    let p = train_pattern(&storage, &["İADE".into(), "ISLAK".into()], "R3", Some(1.0))
        .await
        .unwrap();
    assert_eq!(p.keywords, vec!["iade".to_string(), "ıslak".to_string()]);

    let patterns = storage.list_patterns().await.unwrap();
    let result = KnowledgeMatcher::default().match_message("ıslak ürün iade", &patterns);
    assert_eq!(result.matched.unwrap().id, p.id);
    assert!((result.confidence - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn feedback_on_unknown_pattern_is_not_found() {
    let storage = storage().await;
    let err = record_usage(&storage, 404, Feedback::Positive).await.unwrap_err();
    assert!(matches!(err, HelplineError::NotFound(_)));
}

#[tokio::test]
async fn training_normalizes_keywords_and_rejects_bad_input() {
    let storage = storage().await;
    let p = train_pattern(
        &storage,
        &[" Kargo ".into(), "kargo".into(), "".into(), "Takip".into()],
        "  Kargo takibi profilinizde.  ",
        Some(0.6),
    )
    .await
    .unwrap();
    assert_eq!(p.keywords, vec!["kargo", "takip"]);
    assert_eq!(p.response, "Kargo takibi profilinizde.");

    for (keywords, response, confidence, field) in [
        (vec![" ".to_string()], "R", None, "keywords"),
        (vec!["a".to_string()], "  ", None, "response"),
        (vec!["a".to_string()], "R", Some(1.5), "confidence"),
    ] {
        match train_pattern(&storage, &keywords, response, confidence).await {
            Err(HelplineError::Validation { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

fn feedback_strategy() -> impl Strategy<Value = Feedback> {
    prop_oneof![
        Just(Feedback::Positive),
        Just(Feedback::Negative),
        Just(Feedback::Neutral),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn confidence_stays_clamped(
        start in 0.0f64..=1.0,
        sequence in proptest::collection::vec(feedback_strategy(), 0..40),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let storage = storage().await;
            let p = storage
                .insert_pattern(&NewPattern {
                    keywords: vec!["altın".into()],
                    response: "R1".into(),
                    confidence: start,
                })
                .await
                .unwrap();

            let mut rated = 0u64;
            for feedback in &sequence {
                if let Some(updated) = record_usage(&storage, p.id, *feedback).await.unwrap() {
                    rated += 1;
                    prop_assert!(updated.confidence >= 0.1 - 1e-9);
                    prop_assert!(updated.confidence <= 1.0 + 1e-9);
                    prop_assert!(updated.success_rate >= -1e-9 && updated.success_rate <= 1.0 + 1e-9);
                }
            }
            let stored = &storage.list_patterns().await.unwrap()[0];
            prop_assert_eq!(stored.usage, rated);
            Ok(())
        })?;
    }
}
