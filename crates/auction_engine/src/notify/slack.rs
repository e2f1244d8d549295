use std::time::Duration;

use auction_core::Listing;
use serde_json::json;

use super::{check_status, format_lines, http_client, Notifier, NotifyError};

/// Slack incoming webhook.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
    header: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: &str, header: &str, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(Self {
            client: http_client(timeout)?,
            webhook_url: webhook_url.to_string(),
            header: header.to_string(),
        })
    }

    pub fn message(&self, listings: &[Listing]) -> String {
        format_lines(&self.header, listings).join("\n")
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "Slack"
    }

    async fn notify(&self, listings: &[Listing]) -> Result<(), NotifyError> {
        let payload = json!({ "text": self.message(listings) });
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(NotifyError::from_reqwest)?;
        check_status(response).await
    }
}
