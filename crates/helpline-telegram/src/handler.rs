// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executes admin chat commands against the agent and formats the answer.

use helpline_agent::SupportAgent;
use helpline_analytics::{Period, PeriodStats};
use helpline_core::types::AdminSession;
use helpline_core::HelplineError;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::commands::{AdminCommand, HELP_TEXT, ParseError};

/// Reuse a channel session until it is this close to expiry.
const SESSION_MARGIN_MS: i64 = 60_000;

/// The session commands from the admin chat run under.
///
/// Messages from the admin chat are already authenticated by chat id, so
/// one session is issued and reused until it nears expiry.
#[derive(Debug, Default)]
pub struct ChannelSession {
    current: Mutex<Option<AdminSession>>,
}

impl ChannelSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, agent: &SupportAgent) -> Result<AdminSession, HelplineError> {
        let mut current = self.current.lock().await;
        let now = agent.auth().now_ms();
        if let Some(session) = current.as_ref()
            && session.expires - SESSION_MARGIN_MS > now
        {
            return Ok(session.clone());
        }
        let session = agent.auth().issue_channel_session().await?;
        debug!(expires = session.expires, "channel session issued");
        *current = Some(session.clone());
        Ok(session)
    }
}

/// Answer one chat message. Every input yields some text to send back.
pub async fn handle_text(agent: &SupportAgent, sessions: &ChannelSession, text: &str) -> String {
    match text.parse::<AdminCommand>() {
        Ok(command) => match execute(agent, sessions, command).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "admin command failed");
                describe_error(&e)
            }
        },
        Err(ParseError::NotACommand) => {
            "Komut bekleniyordu. Yardım için /help yazın.".to_string()
        }
        Err(ParseError::Unknown(name)) => format!("Bilinmeyen komut: /{name}\n\n{HELP_TEXT}"),
        Err(ParseError::Usage(usage)) => format!("Kullanım: {usage}"),
    }
}

pub async fn execute(
    agent: &SupportAgent,
    sessions: &ChannelSession,
    command: AdminCommand,
) -> Result<String, HelplineError> {
    match command {
        AdminCommand::Help => Ok(HELP_TEXT.to_string()),
        AdminCommand::Stats(period) => {
            let session = sessions.get(agent).await?;
            let stats = agent.stats(&session, period).await?;
            Ok(format_stats(&stats))
        }
        AdminCommand::Reply { client_id, text } => {
            let session = sessions.get(agent).await?;
            agent.respond(&session, &client_id, &text).await?;
            Ok(format!("✅ [{client_id}] yanıt gönderildi."))
        }
        AdminCommand::Takeover(client_id) => {
            let session = sessions.get(agent).await?;
            agent.takeover(&session, &client_id).await?;
            Ok(format!(
                "🙋 [{client_id}] devralındı. Bot bu sohbette yanıt vermeyecek."
            ))
        }
        AdminCommand::Release(client_id) => {
            let session = sessions.get(agent).await?;
            agent.release(&session, &client_id).await?;
            Ok(format!("🤖 [{client_id}] bota geri verildi."))
        }
    }
}

pub fn format_stats(stats: &PeriodStats) -> String {
    let title = match stats.period {
        Period::Daily => "Günlük",
        Period::Weekly => "Haftalık",
        Period::Monthly => "Aylık",
    };
    format!(
        "📊 {title} istatistikler ({} / {})\nToplam yanıt: {}\n📚 Bot: {}\n🤖 AI: {}\n👤 Temsilci: {}",
        stats.from, stats.to, stats.total, stats.bot, stats.ai, stats.admin
    )
}

fn describe_error(error: &HelplineError) -> String {
    match error {
        HelplineError::NotFound(what) => format!("❌ Bulunamadı: {what}"),
        HelplineError::Validation { field, message } => format!("❌ Geçersiz {field}: {message}"),
        _ => "❌ Komut çalıştırılamadı, ayrıntılar sunucu kayıtlarında.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_are_rendered_with_all_counters() {
        let text = format_stats(&PeriodStats {
            period: Period::Weekly,
            from: "2026-03-04".into(),
            to: "2026-03-10".into(),
            total: 9,
            bot: 5,
            ai: 3,
            admin: 1,
        });
        assert!(text.starts_with("📊 Haftalık"));
        assert!(text.contains("2026-03-04 / 2026-03-10"));
        assert!(text.contains("Toplam yanıt: 9"));
        assert!(text.contains("Temsilci: 1"));
    }

    #[test]
    fn internal_errors_are_not_echoed() {
        let text = describe_error(&HelplineError::Internal("db path /var/x".into()));
        assert!(!text.contains("/var/x"));
    }
}
