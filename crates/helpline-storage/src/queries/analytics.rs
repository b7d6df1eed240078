// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Day-bucketed responder counters.

use helpline_core::types::{DailyAnalytics, Role};
use helpline_core::HelplineError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Increment `total` and the role column of the `date` bucket, creating it if needed.
///
/// Only responder roles have a column; anything else is rejected.
pub async fn increment_daily(db: &Database, date: &str, role: Role) -> Result<(), HelplineError> {
    let column = match role {
        Role::Bot => "bot",
        Role::Ai => "ai",
        Role::Admin => "admin",
        Role::User | Role::System => {
            return Err(HelplineError::Internal(format!(
                "role {role} has no analytics counter"
            )));
        }
    };
    let sql = format!(
        "INSERT INTO daily_analytics (date, total, {column}) VALUES (?1, 1, 1)
         ON CONFLICT(date) DO UPDATE SET total = total + 1, {column} = {column} + 1"
    );
    let date = date.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(&sql, params![date])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Buckets between two ISO dates inclusive, oldest first. Missing days are absent.
pub async fn daily_range(
    db: &Database,
    from: &str,
    to: &str,
) -> Result<Vec<DailyAnalytics>, HelplineError> {
    let (from, to) = (from.to_string(), to.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date, total, bot, ai, admin FROM daily_analytics
                 WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC",
            )?;
            let rows = stmt
                .query_map(params![from, to], |row| {
                    Ok(DailyAnalytics {
                        date: row.get(0)?,
                        total: row.get::<_, i64>(1)? as u64,
                        bot: row.get::<_, i64>(2)? as u64,
                        ai: row.get::<_, i64>(3)? as u64,
                        admin: row.get::<_, i64>(4)? as u64,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}
