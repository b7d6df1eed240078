// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only message log.
//!
//! Timestamps are assigned inside the writer closure as
//! `max(now, last + 1)`, which makes every append an atomic
//! compare-and-append and keeps timestamps strictly increasing even when
//! the wall clock stalls or steps backwards.

use std::str::FromStr;

use helpline_core::types::{ConversationMode, ConversationSummary, Message, NewMessage, Role};
use helpline_core::HelplineError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str = "SELECT timestamp, client_id, role, content, confidence, admin_id FROM messages";

/// Next timestamp given the wall clock and the newest stored timestamp.
pub(crate) fn next_timestamp(now: i64, last: Option<i64>) -> i64 {
    match last {
        Some(last) if last >= now => last + 1,
        _ => now,
    }
}

/// Append a message, assigning its timestamp from `now_ms`.
pub async fn append_message(
    db: &Database,
    message: &NewMessage,
    now_ms: i64,
) -> Result<Message, HelplineError> {
    let msg = message.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let last: Option<i64> =
                tx.query_row("SELECT MAX(timestamp) FROM messages", [], |row| row.get(0))?;
            let timestamp = next_timestamp(now_ms, last);
            tx.execute(
                "INSERT INTO messages (timestamp, client_id, role, content, confidence, admin_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    timestamp,
                    msg.client_id,
                    msg.role.to_string(),
                    msg.content,
                    msg.confidence,
                    msg.admin_id,
                ],
            )?;
            tx.commit()?;
            Ok(Message {
                timestamp,
                client_id: msg.client_id,
                role: msg.role,
                content: msg.content,
                confidence: msg.confidence,
                admin_id: msg.admin_id,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Messages newer than `after`, oldest first, for one client or all of them.
pub async fn messages_after(
    db: &Database,
    client_id: Option<&str>,
    after: i64,
) -> Result<Vec<Message>, HelplineError> {
    let client_id = client_id.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let messages = match client_id {
                Some(client_id) => {
                    let mut stmt = conn.prepare(&format!(
                        "{SELECT_COLUMNS} WHERE client_id = ?1 AND timestamp > ?2 ORDER BY timestamp ASC"
                    ))?;
                    let rows = stmt
                        .query_map(params![client_id, after], row_to_message)?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "{SELECT_COLUMNS} WHERE timestamp > ?1 ORDER BY timestamp ASC"
                    ))?;
                    let rows = stmt
                        .query_map(params![after], row_to_message)?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                }
            };
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn conversation_exists(db: &Database, client_id: &str) -> Result<bool, HelplineError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM messages WHERE client_id = ?1)",
                params![client_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// One row per client with its newest timestamp, message count and mode.
pub async fn conversation_summaries(
    db: &Database,
) -> Result<Vec<ConversationSummary>, HelplineError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.client_id, MAX(m.timestamp), COUNT(*),
                        COALESCE((SELECT t.status FROM takeovers t WHERE t.conversation_id = m.client_id), 'released')
                 FROM messages m
                 GROUP BY m.client_id
                 ORDER BY MAX(m.timestamp) DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    let status: String = row.get(3)?;
                    Ok(ConversationSummary {
                        client_id: row.get(0)?,
                        last_timestamp: row.get(1)?,
                        message_count: row.get::<_, i64>(2)? as u64,
                        mode: if status == "active" {
                            ConversationMode::Human
                        } else {
                            ConversationMode::Auto
                        },
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let role: String = row.get(2)?;
    let role = Role::from_str(&role).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Message {
        timestamp: row.get(0)?,
        client_id: row.get(1)?,
        role,
        content: row.get(3)?,
        confidence: row.get(4)?,
        admin_id: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_timestamp_is_strictly_increasing() {
        assert_eq!(next_timestamp(1_000, None), 1_000);
        assert_eq!(next_timestamp(1_000, Some(500)), 1_000);
        // Same millisecond, or a clock that stepped backwards.
        assert_eq!(next_timestamp(1_000, Some(1_000)), 1_001);
        assert_eq!(next_timestamp(900, Some(1_000)), 1_001);
    }

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let db = Database::open_in_memory().await.unwrap();
        append_message(&db, &NewMessage::user("c1", "merhaba"), 10).await.unwrap();
        append_message(&db, &NewMessage::bot("c1", "Hoş geldiniz", 0.9), 10).await.unwrap();
        append_message(&db, &NewMessage::user("c2", "selam"), 5).await.unwrap();

        let c1 = messages_after(&db, Some("c1"), 0).await.unwrap();
        assert_eq!(c1.len(), 2);
        assert_eq!(c1[0].role, Role::User);
        assert_eq!(c1[1].role, Role::Bot);
        assert_eq!(c1[1].confidence, Some(0.9));
        assert_eq!(c1[0].timestamp, 10);
        assert_eq!(c1[1].timestamp, 11);

        // The clock went backwards for c2 but the log still moves forward.
        let all = messages_after(&db, None, 0).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].client_id, "c2");
        assert_eq!(all[2].timestamp, 12);
    }

    #[tokio::test]
    async fn after_is_exclusive() {
        let db = Database::open_in_memory().await.unwrap();
        let first = append_message(&db, &NewMessage::user("c1", "a"), 100).await.unwrap();
        let second = append_message(&db, &NewMessage::user("c1", "b"), 200).await.unwrap();

        let newer = messages_after(&db, Some("c1"), first.timestamp).await.unwrap();
        assert_eq!(newer, vec![second.clone()]);
        assert!(messages_after(&db, Some("c1"), second.timestamp).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn existence_follows_first_message() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(!conversation_exists(&db, "c1").await.unwrap());
        append_message(&db, &NewMessage::user("c1", "a"), 1).await.unwrap();
        assert!(conversation_exists(&db, "c1").await.unwrap());
        assert!(!conversation_exists(&db, "c2").await.unwrap());
    }

    #[tokio::test]
    async fn summaries_report_mode_from_takeovers() {
        let db = Database::open_in_memory().await.unwrap();
        append_message(&db, &NewMessage::user("c1", "a"), 1).await.unwrap();
        append_message(&db, &NewMessage::user("c2", "b"), 2).await.unwrap();
        append_message(&db, &NewMessage::user("c2", "c"), 3).await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO takeovers (conversation_id, admin_id, timestamp, status) VALUES ('c1', 'admin', 4, 'active')",
                    [],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
            .unwrap();

        let summaries = conversation_summaries(&db).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].client_id, "c2");
        assert_eq!(summaries[0].message_count, 2);
        assert_eq!(summaries[0].mode, ConversationMode::Auto);
        assert_eq!(summaries[1].mode, ConversationMode::Human);
    }
}
