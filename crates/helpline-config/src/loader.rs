// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./helpline.toml` > `~/.config/helpline/helpline.toml` > `/etc/helpline/helpline.toml`
//! with environment variable overrides via `HELPLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HelplineConfig;

/// Config sections, in the order their env prefixes are matched.
const SECTIONS: &[&str] = &[
    "service", "server", "storage", "matcher", "ai", "telegram", "admin",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/helpline/helpline.toml` (system-wide)
/// 3. `~/.config/helpline/helpline.toml` (user XDG config)
/// 4. `./helpline.toml` (local directory)
/// 5. `HELPLINE_*` environment variables
pub fn load_config() -> Result<HelplineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HelplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelplineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HelplineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelplineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HelplineConfig::default()))
        .merge(Toml::file("/etc/helpline/helpline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("helpline/helpline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("helpline.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `HELPLINE_TELEGRAM_BOT_TOKEN` maps to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("HELPLINE_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
