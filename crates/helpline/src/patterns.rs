// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpline patterns` command implementation.
//!
//! Opens the configured database and prints the knowledge base, one
//! pattern per line, so operators can inspect confidence drift without
//! starting the service.

use helpline_config::model::HelplineConfig;
use helpline_core::types::Pattern;
use helpline_core::{HelplineError, StorageAdapter};
use helpline_storage::SqliteStorage;

/// Response previews are cut to this many characters.
const PREVIEW_CHARS: usize = 48;

pub async fn run_patterns(config: &HelplineConfig) -> Result<(), HelplineError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let patterns = storage.list_patterns().await?;
    storage.close().await?;

    if patterns.is_empty() {
        println!("no patterns stored (they are seeded on first `helpline serve`)");
        return Ok(());
    }
    for pattern in &patterns {
        println!("{}", format_pattern(pattern));
    }
    Ok(())
}

fn format_pattern(pattern: &Pattern) -> String {
    let preview: String = pattern.response.chars().take(PREVIEW_CHARS).collect();
    let ellipsis = if pattern.response.chars().count() > PREVIEW_CHARS {
        "…"
    } else {
        ""
    };
    format!(
        "#{:<4} conf={:.2} used={:<5} success={:.2}  [{}]  {preview}{ellipsis}",
        pattern.id,
        pattern.confidence,
        pattern.usage,
        pattern.success_rate,
        pattern.keywords.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(response: &str) -> Pattern {
        Pattern {
            id: 7,
            keywords: vec!["kargo".into(), "teslimat".into()],
            response: response.into(),
            confidence: 0.85,
            usage: 12,
            success_rate: 0.5,
        }
    }

    #[test]
    fn short_responses_are_printed_whole() {
        let line = format_pattern(&pattern("Kargonuz yolda."));
        assert!(line.starts_with("#7"));
        assert!(line.contains("conf=0.85"));
        assert!(line.contains("[kargo, teslimat]"));
        assert!(line.ends_with("Kargonuz yolda."));
    }

    #[test]
    fn long_responses_are_previewed() {
        let long = "ş".repeat(PREVIEW_CHARS + 10);
        let line = format_pattern(&pattern(&long));
        assert!(line.ends_with('…'));
        assert!(!line.contains(&long));
    }
}
