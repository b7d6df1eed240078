// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One takeover row per conversation; re-claiming replaces it.

use std::str::FromStr;

use helpline_core::types::{Takeover, TakeoverStatus};
use helpline_core::HelplineError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

pub async fn upsert_takeover(db: &Database, takeover: &Takeover) -> Result<(), HelplineError> {
    let t = takeover.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO takeovers (conversation_id, admin_id, timestamp, status)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(conversation_id) DO UPDATE SET
                     admin_id = excluded.admin_id,
                     timestamp = excluded.timestamp,
                     status = excluded.status",
                params![t.conversation_id, t.admin_id, t.timestamp, t.status.to_string()],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_takeover(
    db: &Database,
    conversation_id: &str,
) -> Result<Option<Takeover>, HelplineError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT conversation_id, admin_id, timestamp, status FROM takeovers
                 WHERE conversation_id = ?1",
                params![conversation_id],
                |row| {
                    let status: String = row.get(3)?;
                    let status = TakeoverStatus::from_str(&status).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                    Ok(Takeover {
                        conversation_id: row.get(0)?,
                        admin_id: row.get(1)?,
                        timestamp: row.get(2)?,
                        status,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_active(db: &Database) -> Result<u64, HelplineError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM takeovers WHERE status = 'active'",
                [],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn takeover(admin: &str, ts: i64, status: TakeoverStatus) -> Takeover {
        Takeover {
            conversation_id: "c1".into(),
            admin_id: admin.into(),
            timestamp: ts,
            status,
        }
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_takeover(&db, "c1").await.unwrap().is_none());

        upsert_takeover(&db, &takeover("a1", 1, TakeoverStatus::Active)).await.unwrap();
        upsert_takeover(&db, &takeover("a2", 2, TakeoverStatus::Active)).await.unwrap();
        let current = get_takeover(&db, "c1").await.unwrap().unwrap();
        assert_eq!(current.admin_id, "a2");
        assert_eq!(count_active(&db).await.unwrap(), 1);

        upsert_takeover(&db, &takeover("a2", 3, TakeoverStatus::Released)).await.unwrap();
        assert_eq!(count_active(&db).await.unwrap(), 0);
        assert_eq!(
            get_takeover(&db, "c1").await.unwrap().unwrap().status,
            TakeoverStatus::Released
        );
    }
}
