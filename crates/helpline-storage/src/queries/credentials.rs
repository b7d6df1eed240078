// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending one-time codes and admin sessions.

use helpline_core::types::{CodeRedemption, PendingCode, SessionRecord};
use helpline_core::HelplineError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// Store a code, replacing whatever was pending for the identity.
pub async fn put_code(db: &Database, code: &PendingCode) -> Result<(), HelplineError> {
    let c = code.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO admin_codes (identity, code, expires, attempts)
                 VALUES (?1, ?2, ?3, ?4)",
                params![c.identity, c.code, c.expires, c.attempts],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_code(db: &Database, identity: &str) -> Result<Option<PendingCode>, HelplineError> {
    let identity = identity.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT identity, code, expires, attempts FROM admin_codes WHERE identity = ?1",
                params![identity],
                |row| {
                    Ok(PendingCode {
                        identity: row.get(0)?,
                        code: row.get(1)?,
                        expires: row.get(2)?,
                        attempts: row.get(3)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Check `code` against the pending one in a single writer transaction.
pub async fn redeem_code(
    db: &Database,
    identity: &str,
    code: &str,
    now: i64,
    max_attempts: u32,
) -> Result<CodeRedemption, HelplineError> {
    let identity = identity.to_string();
    let code = code.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let pending: Option<(String, i64)> = tx
                .query_row(
                    "SELECT code, expires FROM admin_codes WHERE identity = ?1",
                    params![identity],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let outcome = match pending {
                None => CodeRedemption::NotFound,
                Some((_, expires)) if now > expires => CodeRedemption::Expired,
                Some((stored, _)) if stored == code => CodeRedemption::Redeemed,
                Some(_) => {
                    let attempts: u32 = tx.query_row(
                        "UPDATE admin_codes SET attempts = attempts + 1 WHERE identity = ?1
                         RETURNING attempts",
                        params![identity],
                        |row| row.get(0),
                    )?;
                    CodeRedemption::Mismatch {
                        attempts,
                        discarded: attempts >= max_attempts,
                    }
                }
            };

            let consumed = matches!(
                outcome,
                CodeRedemption::Redeemed
                    | CodeRedemption::Expired
                    | CodeRedemption::Mismatch { discarded: true, .. }
            );
            if consumed {
                tx.execute("DELETE FROM admin_codes WHERE identity = ?1", params![identity])?;
            }
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_code(db: &Database, identity: &str) -> Result<(), HelplineError> {
    let identity = identity.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM admin_codes WHERE identity = ?1", params![identity])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn put_session(db: &Database, session: &SessionRecord) -> Result<(), HelplineError> {
    let s = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO admin_sessions (token_hash, admin_id, created, expires)
                 VALUES (?1, ?2, ?3, ?4)",
                params![s.token_hash, s.admin_id, s.created, s.expires],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_session(
    db: &Database,
    token_hash: &str,
) -> Result<Option<SessionRecord>, HelplineError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT token_hash, admin_id, created, expires FROM admin_sessions
                 WHERE token_hash = ?1",
                params![token_hash],
                |row| {
                    Ok(SessionRecord {
                        token_hash: row.get(0)?,
                        admin_id: row.get(1)?,
                        created: row.get(2)?,
                        expires: row.get(3)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_session(db: &Database, token_hash: &str) -> Result<(), HelplineError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM admin_sessions WHERE token_hash = ?1",
                params![token_hash],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete codes and sessions whose expiry is before `now`.
pub async fn purge_expired(db: &Database, now: i64) -> Result<u64, HelplineError> {
    db.connection()
        .call(move |conn| {
            let codes = conn.execute("DELETE FROM admin_codes WHERE expires < ?1", params![now])?;
            let sessions =
                conn.execute("DELETE FROM admin_sessions WHERE expires < ?1", params![now])?;
            Ok((codes + sessions) as u64)
        })
        .await
        .map_err(map_tr_err)
}
