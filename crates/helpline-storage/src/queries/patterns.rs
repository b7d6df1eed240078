// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern set persistence. Keywords are stored as a JSON array.

use helpline_core::traits::ConfidenceNudge;
use helpline_core::types::{NewPattern, Pattern};
use helpline_core::HelplineError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str =
    "SELECT id, keywords, response, confidence, usage, success_rate FROM patterns";

/// Insert a pattern at the end of the insertion order.
pub async fn insert_pattern(db: &Database, pattern: &NewPattern) -> Result<Pattern, HelplineError> {
    let keywords = serde_json::to_string(&pattern.keywords).map_err(|e| HelplineError::Storage {
        source: Box::new(e),
    })?;
    let new = pattern.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO patterns (keywords, response, confidence) VALUES (?1, ?2, ?3)",
                params![keywords, new.response, new.confidence],
            )?;
            Ok(Pattern {
                id: conn.last_insert_rowid(),
                keywords: new.keywords,
                response: new.response,
                confidence: new.confidence,
                usage: 0,
                success_rate: 0.0,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// All patterns ordered by id, i.e. insertion order.
pub async fn list_patterns(db: &Database) -> Result<Vec<Pattern>, HelplineError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
            let rows = stmt
                .query_map([], row_to_pattern)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Increment `usage` for a pattern the bot just answered with.
pub async fn record_match(db: &Database, id: i64) -> Result<(), HelplineError> {
    let changed = db
        .connection()
        .call(move |conn| {
            let changed =
                conn.execute("UPDATE patterns SET usage = usage + 1 WHERE id = ?1", params![id])?;
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(HelplineError::NotFound(format!("pattern {id}")));
    }
    Ok(())
}

/// Apply feedback in a single UPDATE so concurrent feedback cannot be lost.
///
/// `success_rate` is the running mean of outcomes over rated uses.
pub async fn apply_feedback(
    db: &Database,
    id: i64,
    nudge: ConfidenceNudge,
) -> Result<Pattern, HelplineError> {
    let updated = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE patterns SET
                     usage = usage + 1,
                     confidence = MIN(?3, MAX(?2, confidence + ?1)),
                     success_rate = (success_rate * rated + ?4) / (rated + 1),
                     rated = rated + 1
                 WHERE id = ?5",
                params![nudge.delta, nudge.floor, nudge.ceiling, nudge.outcome, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_pattern,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    updated.ok_or_else(|| HelplineError::NotFound(format!("pattern {id}")))
}

fn row_to_pattern(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pattern> {
    let keywords: String = row.get(1)?;
    let keywords: Vec<String> = serde_json::from_str(&keywords).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Pattern {
        id: row.get(0)?,
        keywords,
        response: row.get(2)?,
        confidence: row.get(3)?,
        usage: row.get::<_, i64>(4)? as u64,
        success_rate: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nudge(delta: f64, outcome: f64) -> ConfidenceNudge {
        ConfidenceNudge {
            delta,
            outcome,
            floor: 0.1,
            ceiling: 1.0,
        }
    }

    fn altin() -> NewPattern {
        NewPattern {
            keywords: vec!["altın".into(), "fiyat".into()],
            response: "R1".into(),
            confidence: 0.8,
        }
    }

    #[tokio::test]
    async fn patterns_keep_insertion_order() {
        let db = Database::open_in_memory().await.unwrap();
        let a = insert_pattern(&db, &altin()).await.unwrap();
        let b = insert_pattern(
            &db,
            &NewPattern {
                keywords: vec!["kargo".into()],
                response: "R2".into(),
                confidence: 0.9,
            },
        )
        .await
        .unwrap();
        assert!(a.id < b.id);

        let all = list_patterns(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].keywords, vec!["altın", "fiyat"]);
        assert_eq!(all[1].response, "R2");
    }

    #[tokio::test]
    async fn feedback_clamps_and_tracks_success() {
        let db = Database::open_in_memory().await.unwrap();
        let p = insert_pattern(&db, &altin()).await.unwrap();

        let mut last = p.clone();
        for _ in 0..10 {
            last = apply_feedback(&db, p.id, nudge(0.05, 1.0)).await.unwrap();
        }
        assert!((last.confidence - 1.0).abs() < 1e-9);
        assert_eq!(last.usage, 10);
        assert!((last.success_rate - 1.0).abs() < 1e-9);

        let after_negative = apply_feedback(&db, p.id, nudge(-0.05, 0.0)).await.unwrap();
        assert!((after_negative.confidence - 0.95).abs() < 1e-9);
        assert!((after_negative.success_rate - 10.0 / 11.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_pattern_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(matches!(
            apply_feedback(&db, 99, nudge(0.05, 1.0)).await,
            Err(HelplineError::NotFound(_))
        ));
        assert!(matches!(record_match(&db, 99).await, Err(HelplineError::NotFound(_))));
    }

    #[tokio::test]
    async fn record_match_bumps_usage_only() {
        let db = Database::open_in_memory().await.unwrap();
        let p = insert_pattern(&db, &altin()).await.unwrap();
        record_match(&db, p.id).await.unwrap();
        let all = list_patterns(&db).await.unwrap();
        assert_eq!(all[0].usage, 1);
        assert_eq!(all[0].confidence, 0.8);
    }
}
