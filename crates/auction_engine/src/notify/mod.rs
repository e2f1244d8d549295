//! Chat notification channels.
//!
//! A channel is only constructed when its configuration is present, so an
//! unconfigured channel costs nothing and never reports an error.
mod slack;
mod telegram;

use std::time::Duration;

use auction_core::Listing;
use auction_logging::{auction_error, auction_info};

pub use slack::SlackNotifier;
pub use telegram::{TelegramConfig, TelegramNotifier, DEFAULT_TELEGRAM_API_BASE};

pub const DEFAULT_MESSAGE_HEADER: &str = "Nye tvangsauktioner i Kolding:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("channel answered {status}: {body}")]
    Status { status: u16, body: String },
}

impl NotifyError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        NotifyError::Transport(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, listings: &[Listing]) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub slack_webhook_url: Option<String>,
    pub telegram: Option<TelegramConfig>,
    pub message_header: String,
    pub timeout: Duration,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            slack_webhook_url: None,
            telegram: None,
            message_header: DEFAULT_MESSAGE_HEADER.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// One notifier per configured channel, Slack first. A channel whose client
/// cannot be built is logged and left out; the others still run.
pub fn build_notifiers(settings: &NotifySettings) -> Vec<Box<dyn Notifier>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if let Some(webhook) = settings.slack_webhook_url.as_deref() {
        push_channel(
            &mut notifiers,
            "slack",
            SlackNotifier::new(webhook, &settings.message_header, settings.timeout),
        );
    }
    if let Some(telegram) = settings.telegram.as_ref() {
        push_channel(
            &mut notifiers,
            "telegram",
            TelegramNotifier::new(telegram.clone(), &settings.message_header, settings.timeout),
        );
    }
    notifiers
}

fn push_channel<N: Notifier + 'static>(
    notifiers: &mut Vec<Box<dyn Notifier>>,
    channel: &str,
    built: Result<N, NotifyError>,
) {
    match built {
        Ok(notifier) => notifiers.push(Box::new(notifier)),
        Err(err) => auction_error!("Skipping {channel} notifier: {err}"),
    }
}

/// Header followed by one `• <title>\n<url>` entry per listing.
pub fn format_lines(header: &str, listings: &[Listing]) -> Vec<String> {
    std::iter::once(header.to_string())
        .chain(
            listings
                .iter()
                .map(|listing| format!("\u{2022} {}\n{}", listing.title(), listing.url())),
        )
        .collect()
}

/// Send `listings` to every channel; a failing channel does not stop the rest.
/// Returns the number of channels that failed.
pub async fn dispatch(notifiers: &[Box<dyn Notifier>], listings: &[Listing]) -> usize {
    let mut failures = 0;
    for notifier in notifiers {
        match notifier.notify(listings).await {
            Ok(()) => auction_info!("{} notification sent", notifier.name()),
            Err(err) => {
                failures += 1;
                auction_error!("{} notification failed: {}", notifier.name(), err);
            }
        }
    }
    failures
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, NotifyError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| NotifyError::Client(err.to_string()))
}

pub(crate) async fn check_status(response: reqwest::Response) -> Result<(), NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Status {
        status: status.as_u16(),
        body,
    })
}
