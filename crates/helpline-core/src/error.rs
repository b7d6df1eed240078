// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Helpline support relay.

use thiserror::Error;

/// Failures of the two-step admin login and of session checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No one-time code is pending for the identity.
    #[error("no pending code for this identity")]
    CodeNotFound,

    /// The pending code is past its expiry.
    #[error("code expired")]
    CodeExpired,

    /// The submitted code does not match the pending one.
    #[error("code mismatch")]
    CodeMismatch,

    /// The bearer token does not belong to any session.
    #[error("session not found")]
    SessionNotFound,

    /// The session is past its fixed expiry.
    #[error("session expired")]
    SessionExpired,
}

/// The primary error type used across all Helpline crates.
#[derive(Debug, Error)]
pub enum HelplineError {
    /// Malformed caller input. Never retried; `field` names the offending input.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The caller is not allowed to perform an admin operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// One-time code or session verification failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Unknown conversation, pattern, or takeover.
    #[error("not found: {0}")]
    NotFound(String),

    /// The completion service or the push channel failed.
    #[error("upstream unavailable: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HelplineError {
    /// Shorthand for a [`HelplineError::Validation`] error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for failures of an external collaborator, which callers recover from locally.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Timeout { .. })
    }
}
