// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Helpline support relay.
//!
//! This crate provides the error taxonomy, the domain types (messages,
//! patterns, takeovers, sessions), the injectable clock, and the adapter
//! traits implemented by storage, the completion provider and the admin
//! push channel.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, HelplineError};
pub use types::{
    AdapterType, AdminSession, ConversationMode, Feedback, HealthStatus, Message, NewMessage,
    Pattern, Role,
};

pub use traits::{
    ChannelAdapter, ConfidenceNudge, PluginAdapter, ProviderAdapter, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::User, Role::Bot, Role::Ai, Role::Admin, Role::System] {
            let s = role.to_string();
            assert_eq!(Role::from_str(&s).unwrap(), role);
        }
        assert_eq!(Role::Ai.to_string(), "ai");
        assert!(Role::from_str("assistant").is_err());
    }

    #[test]
    fn only_bot_ai_admin_are_responders() {
        assert!(!Role::User.is_responder());
        assert!(!Role::System.is_responder());
        assert!(Role::Bot.is_responder());
        assert!(Role::Ai.is_responder());
        assert!(Role::Admin.is_responder());
    }

    #[test]
    fn message_serializes_camel_case_and_skips_empty_fields() {
        let msg = Message {
            timestamp: 42,
            client_id: "c1".into(),
            role: Role::User,
            content: "selam".into(),
            confidence: None,
            admin_id: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["clientId"], "c1");
        assert_eq!(json["role"], "user");
        assert!(json.get("confidence").is_none());
        assert!(json.get("adminId").is_none());
    }

    #[test]
    fn admin_session_never_serializes_token() {
        let session = AdminSession {
            token: "secret".into(),
            admin_id: "admin".into(),
            created: 1,
            expires: 2,
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn auth_errors_convert_into_helpline_error() {
        let err: HelplineError = AuthError::CodeExpired.into();
        assert!(matches!(err, HelplineError::Auth(AuthError::CodeExpired)));
        assert_eq!(err.to_string(), "authentication failed: code expired");
    }

    #[test]
    fn upstream_classification() {
        let upstream = HelplineError::Upstream {
            message: "quota".into(),
            source: None,
        };
        assert!(upstream.is_upstream());
        let timeout = HelplineError::Timeout {
            duration: std::time::Duration::from_secs(1),
        };
        assert!(timeout.is_upstream());
        assert!(!HelplineError::Internal("x".into()).is_upstream());
    }

    #[test]
    fn feedback_parses_lowercase() {
        assert_eq!(Feedback::from_str("positive").unwrap(), Feedback::Positive);
        let fb: Feedback = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(fb, Feedback::Neutral);
    }
}
