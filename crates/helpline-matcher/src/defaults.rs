// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bootstrap knowledge base seeded into an empty pattern table.

use helpline_core::types::NewPattern;
use helpline_core::{HelplineError, StorageAdapter};
use tracing::info;

const DEFAULTS: &[(&[&str], &str, f64)] = &[
    (
        &["merhaba"],
        "Merhaba! Oyun destek hattına hoş geldiniz. Size nasıl yardımcı olabilirim?",
        0.9,
    ),
    (
        &["altın", "fiyat"],
        "Güncel altın fiyatlarını oyun içi mağazada ve web sitemizdeki fiyat listesinde görebilirsiniz.",
        0.8,
    ),
    (
        &["şifre", "unuttum"],
        "Şifrenizi giriş ekranındaki \"Şifremi unuttum\" bağlantısından sıfırlayabilirsiniz.",
        0.9,
    ),
    (
        &["hesap", "çalındı"],
        "Hesabınızın güvenliği için hemen şifrenizi değiştirin; bir yetkilimiz en kısa sürede sizinle ilgilenecek.",
        0.85,
    ),
    (
        &["ödeme", "yansımadı"],
        "Ödemeler genellikle 15 dakika içinde hesaba yansır. Sorun devam ederse dekont ile bize yazın.",
        0.8,
    ),
    (
        &["iade"],
        "İade talepleri satın alımdan sonraki 14 gün içinde destek ekibimiz tarafından değerlendirilir.",
        0.75,
    ),
    (
        &["teşekkür"],
        "Rica ederiz! Başka bir sorunuz olursa buradayız.",
        0.9,
    ),
];

/// The bootstrap patterns, in seeding order.
pub fn default_patterns() -> Vec<NewPattern> {
    DEFAULTS
        .iter()
        .map(|(keywords, response, confidence)| NewPattern {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            response: response.to_string(),
            confidence: *confidence,
        })
        .collect()
}

/// Insert the bootstrap patterns if the table is empty. Returns how many were added.
pub async fn seed_if_empty(storage: &dyn StorageAdapter) -> Result<usize, HelplineError> {
    if !storage.list_patterns().await?.is_empty() {
        return Ok(0);
    }
    let defaults = default_patterns();
    for pattern in &defaults {
        storage.insert_pattern(pattern).await?;
    }
    info!(count = defaults.len(), "seeded default patterns");
    Ok(defaults.len())
}
