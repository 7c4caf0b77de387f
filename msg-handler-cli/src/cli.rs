use std::path::PathBuf;

use clap::{Parser, Subcommand};
use msg_sender::ChannelKind;
use msg_sender::channels::TELEGRAM_API_BASE;

#[derive(Debug, Parser)]
#[command(
    name = "web-msg-handler",
    version,
    about = "Deliver a contact-form submission by email or Telegram"
)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Bound on the delivery attempt in seconds (0 waits indefinitely)
    #[arg(long, global = true, default_value_t = 30, env = "WEB_MSG_HANDLER_TIMEOUT")]
    pub timeout: u64,

    /// Telegram Bot API base URL
    #[arg(long, global = true, hide = true, env = "TELEGRAM_API_BASE", default_value = TELEGRAM_API_BASE)]
    pub telegram_api_base: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deliver with an inline JSON channel configuration
    Send {
        /// Delivery channel
        #[arg(value_enum)]
        channel: ChannelKind,
        /// Channel configuration as a JSON object
        config: String,
        /// Message as a JSON object with `name`, `mail` and `msg`
        message: String,
    },

    /// Deliver with the configuration from a TOML site file
    Site {
        /// Site file with `sender_type` and a `[sender]` table
        path: PathBuf,
        /// Message as a JSON object with `name`, `mail` and `msg`
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send() {
        let args = Args::try_parse_from([
            "web-msg-handler",
            "send",
            "telegram",
            r#"{"website_name":"A","chat_id":1,"bot_token":"t"}"#,
            r#"{"name":"Bob","mail":"b@b.com","msg":"hi"}"#,
        ])
        .unwrap();

        assert_eq!(args.timeout, 30);
        assert_eq!(args.telegram_api_base, "https://api.telegram.org");
        match args.command {
            Commands::Send { channel, .. } => assert_eq!(channel, ChannelKind::Telegram),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_mail_alias() {
        let args =
            Args::try_parse_from(["web-msg-handler", "send", "mail", "{}", "{}"]).unwrap();
        assert!(matches!(
            args.command,
            Commands::Send {
                channel: ChannelKind::Email,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_site_with_flags() {
        let args = Args::try_parse_from([
            "web-msg-handler",
            "site",
            "sites/acme.toml",
            "{}",
            "--timeout",
            "0",
            "-v",
        ])
        .unwrap();

        assert!(args.verbose);
        assert_eq!(args.timeout, 0);
        assert!(matches!(args.command, Commands::Site { .. }));
    }

    #[test]
    fn test_missing_message_is_rejected() {
        assert!(Args::try_parse_from(["web-msg-handler", "send", "email", "{}"]).is_err());
        assert!(Args::try_parse_from(["web-msg-handler", "send", "sms", "{}", "{}"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["web-msg-handler", "-v", "-q", "site", "x", "{}"]).is_err());
    }
}
