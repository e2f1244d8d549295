//! Process configuration, read once at startup from the environment
//! (optionally seeded from a `.env` file) and refined by CLI flags.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use auction_engine::{
    FetchSettings, NotifySettings, TelegramConfig, DEFAULT_BASE_URL, DEFAULT_SEEN_FILE,
    DEFAULT_TELEGRAM_API_BASE, DEFAULT_USER_AGENT,
};
use auction_logging::auction_warn;
use dotenvy::dotenv;
use url::Url;

use crate::cli::Cli;

pub const DEFAULT_LISTINGS_URL: &str = "https://www.boligsiden.dk/tvangsauktioner/kommune/kolding";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub listings_url: String,
    pub base_url: Url,
    pub seen_file: PathBuf,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub slack_webhook_url: Option<String>,
    pub telegram: Option<TelegramConfig>,
    pub log_file: Option<PathBuf>,
    /// Only one of the two Telegram variables was set.
    pub telegram_incomplete: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = var("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).context("BASE_URL must be an absolute URL")?;

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let token = var("TELEGRAM_BOT_TOKEN");
        let chat_id = var("TELEGRAM_CHAT_ID");
        let telegram_incomplete = token.is_some() != chat_id.is_some();
        let telegram = token.zip(chat_id).map(|(token, chat_id)| TelegramConfig {
            api_base: var("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            ..TelegramConfig::new(token, chat_id)
        });

        Ok(Self {
            listings_url: var("LISTINGS_URL").unwrap_or_else(|| DEFAULT_LISTINGS_URL.to_string()),
            base_url,
            seen_file: var("SEEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SEEN_FILE)),
            user_agent: var("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
            slack_webhook_url: var("SLACK_WEBHOOK_URL"),
            telegram,
            log_file: var("LOG_FILE").map(PathBuf::from),
            telegram_incomplete,
        })
    }

    /// Log anything odd about the configuration; call once logging is up.
    pub fn report_warnings(&self) {
        if self.telegram_incomplete {
            auction_warn!(
                "Telegram needs both TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID; channel disabled"
            );
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = cli.url.as_ref() {
            self.listings_url = url.clone();
        }
        if let Some(path) = cli.seen_file.as_ref() {
            self.seen_file = path.clone();
        }
        if let Some(path) = cli.log_file.as_ref() {
            self.log_file = Some(path.clone());
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: self.request_timeout,
            user_agent: self.user_agent.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn notify_settings(&self) -> NotifySettings {
        NotifySettings {
            slack_webhook_url: self.slack_webhook_url.clone(),
            telegram: self.telegram.clone(),
            ..NotifySettings::default()
        }
    }
}
