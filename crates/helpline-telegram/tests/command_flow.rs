// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin chat commands driven against a full agent.

use helpline_core::ConversationMode;
use helpline_core::types::Role;
use helpline_telegram::handler::{ChannelSession, handle_text};
use helpline_test_utils::TestHarness;

#[tokio::test]
async fn takeover_reply_release_through_chat() {
    let h = TestHarness::new().await.unwrap();
    let sessions = ChannelSession::new();
    h.agent.handle_user_message("c1", "kargo nerede").await.unwrap();

    let text = handle_text(&h.agent, &sessions, "/takeover c1").await;
    assert!(text.contains("devralındı"));
    assert_eq!(h.agent.mode("c1").await.unwrap(), ConversationMode::Human);

    let text = handle_text(&h.agent, &sessions, "/reply c1 Kargonuz yarın teslim edilecek.").await;
    assert!(text.contains("yanıt gönderildi"));
    let last = h.agent.history("c1").await.unwrap().pop().unwrap();
    assert_eq!(last.role, Role::Admin);
    assert_eq!(last.content, "Kargonuz yarın teslim edilecek.");

    let text = handle_text(&h.agent, &sessions, "/release c1").await;
    assert!(text.contains("bota geri"));
    assert_eq!(h.agent.mode("c1").await.unwrap(), ConversationMode::Auto);
}

#[tokio::test]
async fn stats_command_counts_replies() {
    let h = TestHarness::new().await.unwrap();
    let sessions = ChannelSession::new();
    h.agent.handle_user_message("c1", "merhaba").await.unwrap();
    h.agent.handle_user_message("c2", "kargo nerede").await.unwrap();

    let text = handle_text(&h.agent, &sessions, "/stats").await;
    assert!(text.contains("Günlük"));
    assert!(text.contains("Toplam yanıt: 2"));
    assert!(text.contains("Bot: 1"));
    assert!(text.contains("AI: 1"));
}

#[tokio::test]
async fn errors_are_reported_in_chat() {
    let h = TestHarness::new().await.unwrap();
    let sessions = ChannelSession::new();

    assert!(handle_text(&h.agent, &sessions, "/takeover ghost").await.contains("Bulunamadı"));
    assert!(handle_text(&h.agent, &sessions, "/reply c1").await.starts_with("Kullanım"));
    assert!(handle_text(&h.agent, &sessions, "/dance").await.contains("Bilinmeyen komut"));
    assert!(handle_text(&h.agent, &sessions, "selam").await.contains("/help"));
}

#[tokio::test]
async fn channel_session_is_reused_until_expiry() {
    let h = TestHarness::new().await.unwrap();
    let sessions = ChannelSession::new();

    let first = sessions.get(&h.agent).await.unwrap();
    let again = sessions.get(&h.agent).await.unwrap();
    assert_eq!(first.token, again.token);

    h.advance(std::time::Duration::from_secs(24 * 60 * 60));
    let renewed = sessions.get(&h.agent).await.unwrap();
    assert_ne!(first.token, renewed.token);
    assert!(h.agent.conversations(&renewed).await.is_ok());
}
