//! Auction engine: fetch, extraction, seen-set persistence, notification and
//! the single-pass run that wires them together.
mod decode;
mod extract;
mod fetch;
mod notify;
mod persist;
mod pipeline;
mod seen_store;
mod types;

pub use decode::{decode_page, DecodedPage};
pub use extract::{
    EmbeddedDataStrategy, ExtractStrategy, ListingExtractor, MarkupCardStrategy, DEFAULT_BASE_URL,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use notify::{
    build_notifiers, dispatch, format_lines, NotifyError, NotifySettings, Notifier, SlackNotifier,
    TelegramConfig, TelegramNotifier, DEFAULT_MESSAGE_HEADER, DEFAULT_TELEGRAM_API_BASE,
};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use pipeline::{Pipeline, RunError, RunOptions, RunReport};
pub use seen_store::{SeenStore, SeenStoreError, DEFAULT_SEEN_FILE};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
