use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use auction_logging::{auction_debug, auction_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_page;
use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ListingsBot/1.0; +https://github.com/SimonThiesen/TvangsauktionerListings)";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
    pub max_attempts: u32,
    /// Attempt `n` (0-based) that fails waits `backoff_step * (n + 1)`.
    pub backoff_step: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(20),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_attempts: 3,
            backoff_step: Duration::from_secs(2),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;

    /// Fetch and decode the body to text. Undecodable bytes are replaced,
    /// never fatal.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let output = self.fetch(url).await?;
        let page = decode_page(&output.bytes, output.metadata.content_type.as_deref());
        if page.had_errors {
            auction_warn!(
                "Body of {} had malformed {} sequences; replaced them",
                output.metadata.final_url,
                page.encoding_label
            );
        }
        Ok(page.text)
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .user_agent(self.settings.user_agent.clone())
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn backoff_after(&self, attempt: u32) -> Duration {
        self.settings.backoff_step * (attempt + 1)
    }

    async fn fetch_once(&self, url: &reqwest::Url) -> Result<FetchOutput, FetchError> {
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: redirect_counter.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
            attempts: 1,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let max_attempts = self.settings.max_attempts.max(1);

        let mut attempt = 0;
        loop {
            match self.fetch_once(&parsed).await {
                Ok(mut output) => {
                    output.metadata.attempts = attempt + 1;
                    auction_debug!(
                        "Fetched {} bytes from {} on attempt {}",
                        output.metadata.byte_len,
                        output.metadata.final_url,
                        attempt + 1
                    );
                    return Ok(output);
                }
                Err(err) => {
                    auction_warn!("Fetch attempt {} for {} failed: {}", attempt + 1, url, err.kind);
                    let last = attempt + 1 >= max_attempts;
                    if last || !err.kind.is_retryable() {
                        return Err(err.after_attempts(attempt + 1));
                    }
                    tokio::time::sleep(self.backoff_after(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
