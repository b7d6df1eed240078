// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Helpline workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user typing in the widget.
    User,
    /// A canned pattern reply.
    Bot,
    /// A reply from the completion service.
    Ai,
    /// A human admin reply.
    Admin,
    /// Takeover greetings and release notices.
    System,
}

impl Role {
    /// Roles that answer a user and are counted by analytics.
    pub fn is_responder(self) -> bool {
        matches!(self, Role::Bot | Role::Ai | Role::Admin)
    }
}

/// A persisted chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Milliseconds since the epoch; strictly increasing across the store.
    pub timestamp: i64,
    pub client_id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
}

/// A message waiting to be appended. The store assigns the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub client_id: String,
    pub role: Role,
    pub content: String,
    pub confidence: Option<f64>,
    pub admin_id: Option<String>,
}

impl NewMessage {
    pub fn user(client_id: &str, content: &str) -> Self {
        Self::new(client_id, Role::User, content, None, None)
    }

    pub fn bot(client_id: &str, content: &str, confidence: f64) -> Self {
        Self::new(client_id, Role::Bot, content, Some(confidence), None)
    }

    pub fn ai(client_id: &str, content: &str, confidence: f64) -> Self {
        Self::new(client_id, Role::Ai, content, Some(confidence), None)
    }

    pub fn admin(client_id: &str, admin_id: &str, content: &str) -> Self {
        Self::new(client_id, Role::Admin, content, None, Some(admin_id.to_string()))
    }

    pub fn system(client_id: &str, admin_id: &str, content: &str) -> Self {
        Self::new(client_id, Role::System, content, None, Some(admin_id.to_string()))
    }

    fn new(
        client_id: &str,
        role: Role,
        content: &str,
        confidence: Option<f64>,
        admin_id: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.to_string(),
            role,
            content: content.to_string(),
            confidence,
            admin_id,
        }
    }
}

/// A canned keyword pattern. Ordering is insertion order (`id` ascending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: i64,
    pub keywords: Vec<String>,
    pub response: String,
    pub confidence: f64,
    pub usage: u64,
    pub success_rate: f64,
}

/// A pattern to be inserted by bootstrap or admin training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPattern {
    pub keywords: Vec<String>,
    pub response: String,
    pub confidence: f64,
}

/// Polarity of feedback on a bot reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
    Neutral,
}

/// Per-day responder counters, keyed by UTC date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAnalytics {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub total: u64,
    pub bot: u64,
    pub ai: u64,
    pub admin: u64,
}

/// An authenticated admin session as handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    #[serde(skip_serializing)]
    pub token: String,
    pub admin_id: String,
    pub created: i64,
    pub expires: i64,
}

/// A persisted session row. Only the token digest is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_hash: String,
    pub admin_id: String,
    pub created: i64,
    pub expires: i64,
}

/// A one-time login code waiting to be verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCode {
    pub identity: String,
    pub code: String,
    pub expires: i64,
    pub attempts: u32,
}

/// Result of checking a submitted code against the pending one.
///
/// Decided in one storage step, so a code can be redeemed at most once and
/// overlapping guesses cannot skip the attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRedemption {
    /// The code matched and has been consumed.
    Redeemed,
    NotFound,
    /// Past expiry; the code has been removed.
    Expired,
    /// Wrong code. `discarded` is set once the attempt cap was reached.
    Mismatch { attempts: u32, discarded: bool },
}

/// Lifecycle of an admin claim on a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TakeoverStatus {
    Active,
    Released,
}

/// A human admin's claim on a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Takeover {
    pub conversation_id: String,
    pub admin_id: String,
    pub timestamp: i64,
    pub status: TakeoverStatus,
}

/// Who is currently answering a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    /// Pattern bot and completion service answer.
    Auto,
    /// An admin holds an active takeover; automated tiers stay silent.
    Human,
}

/// Admin console listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub client_id: String,
    pub last_timestamp: i64,
    pub message_count: u64,
    pub mode: ConversationMode,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
    Observability,
}

/// A request to the text-completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Domain-restriction instructions.
    pub system: String,
    /// The end user's message.
    pub user: String,
    pub max_tokens: u32,
}

/// The generated text from the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
}
