use std::{fmt, str::FromStr};

use clap::Parser;
use simplelog::LevelFilter;

use crate::auth::InitDataVerifier;

/// Telegram bot token. Formats as a placeholder so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for BotToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err("bot token must not be empty".to_owned());
        }
        Ok(Self(token.to_owned()))
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(<redacted>)")
    }
}

impl fmt::Display for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "admarket", about = "Telegram ad marketplace backend")]
pub struct Settings {
    /// Token issued by @BotFather, also the init data signing secret
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: BotToken,
    #[arg(long, env = "DB_URL", default_value = "sqlite:admarket.db")]
    pub db_url: String,
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
    /// Log at debug level or lower
    #[arg(long, env = "DEBUG")]
    pub debug: bool,
}

impl Settings {
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            self.log_level.max(LevelFilter::Debug)
        } else {
            self.log_level
        }
    }
    pub fn verifier(&self) -> InitDataVerifier {
        InitDataVerifier::new(self.bot_token.expose())
    }
}
