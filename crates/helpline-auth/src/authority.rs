// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-step admin login and session verification.
//!
//! Codes and sessions live in the store, so they survive restarts and
//! every check reads one row. All expiry decisions use the injected clock.

use std::sync::Arc;
use std::time::Duration;

use helpline_config::model::AdminConfig;
use helpline_core::types::{AdminSession, CodeRedemption, PendingCode, SessionRecord};
use helpline_core::{AuthError, ChannelAdapter, Clock, HelplineError, StorageAdapter};
use tracing::{debug, info, warn};

use crate::token::{generate_code, generate_token, hash_token};

/// Issues one-time codes and the sessions they unlock.
pub struct AdminSessionAuthority {
    storage: Arc<dyn StorageAdapter>,
    notifier: Arc<dyn ChannelAdapter>,
    clock: Arc<dyn Clock>,
    config: AdminConfig,
    send_timeout: Duration,
}

impl AdminSessionAuthority {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        notifier: Arc<dyn ChannelAdapter>,
        clock: Arc<dyn Clock>,
        config: AdminConfig,
        send_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            notifier,
            clock,
            config,
            send_timeout,
        }
    }

    /// The one identity allowed to log in.
    pub fn admin_identity(&self) -> &str {
        &self.config.identity
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Generate a code for `identity` and push it to the admin channel.
    ///
    /// Returns `Ok(false)` when the push fails; the code is then discarded
    /// so it can never be used.
    pub async fn request_code(&self, identity: &str) -> Result<bool, HelplineError> {
        if identity != self.config.identity {
            warn!(identity, "login code requested for unknown identity");
            return Err(HelplineError::Unauthorized("unknown admin identity".into()));
        }

        let code = generate_code();
        let ttl = self.config.code_ttl_secs;
        self.storage
            .put_code(&PendingCode {
                identity: identity.to_string(),
                code: code.clone(),
                expires: self.clock.now_ms() + secs_to_ms(ttl),
                attempts: 0,
            })
            .await?;

        let text = format!(
            "Yönetici giriş kodunuz: {code}\nKod {} dakika geçerlidir.",
            ttl.div_ceil(60)
        );
        let push = tokio::time::timeout(self.send_timeout, self.notifier.send_text(&text));
        let delivered = match push.await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "login code push failed");
                false
            }
            Err(_) => {
                warn!(timeout = ?self.send_timeout, "login code push timed out");
                false
            }
        };

        if !delivered {
            self.storage.delete_code(identity).await?;
            return Ok(false);
        }
        info!(identity, "login code sent");
        Ok(true)
    }

    /// Exchange a pending code for a session.
    pub async fn verify_code(
        &self,
        identity: &str,
        code: &str,
    ) -> Result<AdminSession, HelplineError> {
        let outcome = self
            .storage
            .redeem_code(
                identity,
                code.trim(),
                self.clock.now_ms(),
                self.config.max_code_attempts,
            )
            .await?;

        match outcome {
            CodeRedemption::Redeemed => {}
            CodeRedemption::NotFound => return Err(AuthError::CodeNotFound.into()),
            CodeRedemption::Expired => {
                debug!(identity, "expired login code rejected");
                return Err(AuthError::CodeExpired.into());
            }
            CodeRedemption::Mismatch {
                attempts,
                discarded,
            } => {
                warn!(identity, attempts, "login code mismatch");
                if discarded {
                    warn!(identity, "login code discarded after too many attempts");
                }
                return Err(AuthError::CodeMismatch.into());
            }
        }

        let session = self.create_session(identity).await?;
        info!(identity, expires = session.expires, "admin session created");
        Ok(session)
    }

    /// Resolve a bearer token to its live session.
    pub async fn verify_session(&self, token: &str) -> Result<AdminSession, HelplineError> {
        let token_hash = hash_token(token);
        let record = self
            .storage
            .get_session(&token_hash)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if self.clock.now_ms() > record.expires {
            self.storage.delete_session(&token_hash).await?;
            return Err(AuthError::SessionExpired.into());
        }

        Ok(AdminSession {
            token: token.to_string(),
            admin_id: record.admin_id,
            created: record.created,
            expires: record.expires,
        })
    }

    /// A session for commands arriving through the authenticated admin chat.
    pub async fn issue_channel_session(&self) -> Result<AdminSession, HelplineError> {
        let identity = self.config.identity.clone();
        self.create_session(&identity).await
    }

    /// Delete every expired code and session.
    pub async fn purge_expired(&self) -> Result<u64, HelplineError> {
        let purged = self.storage.purge_expired(self.clock.now_ms()).await?;
        if purged > 0 {
            debug!(purged, "expired credentials purged");
        }
        Ok(purged)
    }

    async fn create_session(&self, identity: &str) -> Result<AdminSession, HelplineError> {
        let token = generate_token()?;
        let created = self.clock.now_ms();
        let expires = created + secs_to_ms(self.config.session_ttl_secs);
        self.storage
            .put_session(&SessionRecord {
                token_hash: hash_token(&token),
                admin_id: identity.to_string(),
                created,
                expires,
            })
            .await?;
        Ok(AdminSession {
            token,
            admin_id: identity.to_string(),
            created,
            expires,
        })
    }
}

fn secs_to_ms(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}
