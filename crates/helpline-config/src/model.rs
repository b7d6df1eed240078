// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Helpline support relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Helpline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HelplineConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Knowledge matcher settings.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Completion service settings.
    #[serde(default)]
    pub ai: AiConfig,

    /// Telegram control channel settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Admin login and session settings.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl HelplineConfig {
    /// A copy safe to print: secrets are replaced by a marker.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.ai.api_key.is_some() {
            copy.ai.api_key = Some(REDACTED.to_string());
        }
        if copy.telegram.bot_token.is_some() {
            copy.telegram.bot_token = Some(REDACTED.to_string());
        }
        copy
    }
}

const REDACTED: &str = "[redacted]";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in notifications.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "helpline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("helpline").join("helpline.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("helpline.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Knowledge matcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Weighted confidence below which a message escalates to the completion service.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Insert the built-in patterns when the pattern table is empty.
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            seed_defaults: default_seed_defaults(),
        }
    }
}

fn default_threshold() -> f64 {
    0.7
}

fn default_seed_defaults() -> bool {
    true
}

/// Completion service configuration (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    /// API key. `None` disables the completion tier; every escalation gets the fallback.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Token budget per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on one escalation, retries included.
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,

    /// Replaces the built-in domain-restriction instructions.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_ai_timeout_secs(),
            system_prompt: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_ai_timeout_secs() -> u64 {
    15
}

/// Telegram control channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables Telegram integration.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat that receives notifications and login codes, and the only chat
    /// whose commands are obeyed.
    #[serde(default)]
    pub admin_chat_id: Option<i64>,

    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Push every inbound user message, not only escalations and takeover traffic.
    #[serde(default)]
    pub notify_user_messages: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_chat_id: None,
            send_timeout_secs: default_send_timeout_secs(),
            notify_user_messages: false,
        }
    }
}

fn default_send_timeout_secs() -> u64 {
    5
}

/// Admin login configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// The single identity allowed to request a login code.
    #[serde(default = "default_identity")]
    pub identity: String,

    #[serde(default = "default_code_ttl_secs")]
    pub code_ttl_secs: u64,

    /// Fixed lifetime of a session from creation.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Wrong guesses tolerated before a pending code is discarded.
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,

    /// How often expired codes and sessions are purged.
    #[serde(default = "default_housekeeping_interval_secs")]
    pub housekeeping_interval_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            code_ttl_secs: default_code_ttl_secs(),
            session_ttl_secs: default_session_ttl_secs(),
            max_code_attempts: default_max_code_attempts(),
            housekeeping_interval_secs: default_housekeeping_interval_secs(),
        }
    }
}

fn default_identity() -> String {
    "admin".to_string()
}

fn default_code_ttl_secs() -> u64 {
    5 * 60
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_max_code_attempts() -> u32 {
    5
}

fn default_housekeeping_interval_secs() -> u64 {
    10 * 60
}
