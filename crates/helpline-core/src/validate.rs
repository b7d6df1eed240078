// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input validation shared by the router and the admin operations.

use crate::error::HelplineError;

/// Maximum message length in characters (not bytes).
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Maximum client identifier length.
pub const MAX_CLIENT_ID_LEN: usize = 128;

/// Trims `text` and checks it holds 1 to [`MAX_MESSAGE_CHARS`] characters.
pub fn message_text(text: &str) -> Result<&str, HelplineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(HelplineError::validation("text", "must not be empty"));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(HelplineError::validation(
            "text",
            format!("must be at most {MAX_MESSAGE_CHARS} characters, got {chars}"),
        ));
    }
    Ok(trimmed)
}

/// Checks a client identifier: 1 to 128 characters of `[A-Za-z0-9_.:-]`.
pub fn client_id(id: &str) -> Result<&str, HelplineError> {
    if id.is_empty() {
        return Err(HelplineError::validation("clientId", "must not be empty"));
    }
    if id.len() > MAX_CLIENT_ID_LEN {
        return Err(HelplineError::validation(
            "clientId",
            format!("must be at most {MAX_CLIENT_ID_LEN} characters"),
        ));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')))
    {
        return Err(HelplineError::validation(
            "clientId",
            format!("contains invalid character {bad:?}"),
        ));
    }
    Ok(id)
}
