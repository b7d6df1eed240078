// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of slash commands typed in the admin chat.

use std::str::FromStr;

use helpline_analytics::Period;

/// A command accepted from the admin chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Stats(Period),
    Reply { client_id: String, text: String },
    Takeover(String),
    Release(String),
    Help,
}

/// Why a chat message is not a usable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Plain text, not a slash command.
    NotACommand,
    Unknown(String),
    /// Known command with wrong arguments; carries the usage line.
    Usage(&'static str),
}

pub const HELP_TEXT: &str = "Komutlar:\n\
/stats [daily|weekly|monthly] - istatistikler\n\
/reply <clientId> <mesaj> - kullanıcıya yanıt ver\n\
/takeover <clientId> - sohbeti devral\n\
/release <clientId> - sohbeti bota geri ver\n\
/help - bu mesaj";

impl FromStr for AdminCommand {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let Some(body) = input.strip_prefix('/') else {
            return Err(ParseError::NotACommand);
        };

        let (head, rest) = match body.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (body, ""),
        };
        // Group chats append the bot name: /stats@helpline_bot
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        match name.as_str() {
            "stats" => {
                if rest.is_empty() {
                    return Ok(AdminCommand::Stats(Period::default()));
                }
                Period::from_str(&rest.to_lowercase())
                    .map(AdminCommand::Stats)
                    .map_err(|_| ParseError::Usage("/stats [daily|weekly|monthly]"))
            }
            "reply" => match rest.split_once(char::is_whitespace) {
                Some((client_id, text)) if !text.trim().is_empty() => Ok(AdminCommand::Reply {
                    client_id: client_id.to_string(),
                    text: text.trim().to_string(),
                }),
                _ => Err(ParseError::Usage("/reply <clientId> <mesaj>")),
            },
            "takeover" => single_arg(rest)
                .map(AdminCommand::Takeover)
                .ok_or(ParseError::Usage("/takeover <clientId>")),
            "release" => single_arg(rest)
                .map(AdminCommand::Release)
                .ok_or(ParseError::Usage("/release <clientId>")),
            "help" | "start" => Ok(AdminCommand::Help),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn single_arg(rest: &str) -> Option<String> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(arg), None) => Some(arg.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<AdminCommand, ParseError> {
        s.parse()
    }

    #[test]
    fn stats_defaults_to_daily() {
        assert_eq!(parse("/stats"), Ok(AdminCommand::Stats(Period::Daily)));
        assert_eq!(parse("/stats Weekly"), Ok(AdminCommand::Stats(Period::Weekly)));
        assert_eq!(parse("/stats monthly"), Ok(AdminCommand::Stats(Period::Monthly)));
        assert!(matches!(parse("/stats yearly"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn reply_keeps_the_whole_text() {
        assert_eq!(
            parse("/reply c-42  Siparişiniz yolda, iyi oyunlar!"),
            Ok(AdminCommand::Reply {
                client_id: "c-42".into(),
                text: "Siparişiniz yolda, iyi oyunlar!".into(),
            })
        );
        assert!(matches!(parse("/reply c-42"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("/reply"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn takeover_and_release_take_one_id() {
        assert_eq!(parse("/takeover c1"), Ok(AdminCommand::Takeover("c1".into())));
        assert_eq!(parse("/release c1"), Ok(AdminCommand::Release("c1".into())));
        assert!(matches!(parse("/takeover"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("/release c1 c2"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn bot_suffix_is_ignored() {
        assert_eq!(parse("/help@helpline_bot"), Ok(AdminCommand::Help));
        assert_eq!(
            parse("/takeover@helpline_bot c9"),
            Ok(AdminCommand::Takeover("c9".into()))
        );
    }

    #[test]
    fn non_commands_and_unknowns() {
        assert_eq!(parse("merhaba"), Err(ParseError::NotACommand));
        assert_eq!(parse("/dance"), Err(ParseError::Unknown("dance".into())));
    }
}
