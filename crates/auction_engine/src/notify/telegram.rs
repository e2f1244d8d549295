use std::time::Duration;

use auction_core::Listing;

use super::{check_status, format_lines, http_client, Notifier, NotifyError};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Both the bot token and the chat id are needed; a half-configured bot is
/// treated as not configured by whoever builds this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
        }
    }

    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

/// Telegram Bot API `sendMessage`.
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
    header: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, header: &str, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(Self {
            client: http_client(timeout)?,
            config,
            header: header.to_string(),
        })
    }

    pub fn message(&self, listings: &[Listing]) -> String {
        format_lines(&self.header, listings).join("\n\n")
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "Telegram"
    }

    async fn notify(&self, listings: &[Listing]) -> Result<(), NotifyError> {
        let text = self.message(listings);
        let form = [
            ("chat_id", self.config.chat_id.as_str()),
            ("text", text.as_str()),
            ("disable_web_page_preview", "true"),
        ];
        let response = self
            .client
            .post(self.config.send_message_url())
            .form(&form)
            .send()
            .await
            .map_err(NotifyError::from_reqwest)?;
        check_status(response).await
    }
}
