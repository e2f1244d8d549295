use auction_core::{diff, Listing};
use auction_logging::{auction_error, auction_info, auction_warn};

use crate::extract::ListingExtractor;
use crate::fetch::Fetcher;
use crate::notify::{dispatch, Notifier};
use crate::seen_store::SeenStore;
use crate::FetchError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Report new listings without notifying or touching the store.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub current: Vec<Listing>,
    pub new_listings: Vec<Listing>,
    /// Whether the store was rewritten during this run.
    pub persisted: bool,
    pub notify_failures: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("fetch stage failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// One fetch -> extract -> diff -> notify -> persist pass.
pub struct Pipeline {
    fetcher: Box<dyn Fetcher>,
    extractor: ListingExtractor,
    store: SeenStore,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Pipeline {
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        extractor: ListingExtractor,
        store: SeenStore,
        notifiers: Vec<Box<dyn Notifier>>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            notifiers,
        }
    }

    pub async fn run(&self, listings_url: &str, options: RunOptions) -> Result<RunReport, RunError> {
        auction_info!("Fetching listings page {}", listings_url);
        let page = self
            .fetcher
            .fetch_text(listings_url)
            .await
            .map_err(|source| RunError::Fetch {
                url: listings_url.to_string(),
                source,
            })?;

        let current = self.extractor.extract(&page);
        auction_info!("Total listings found: {}", current.len());

        let seen = self.store.load();
        auction_info!("Previously seen count: {}", seen.len());

        let new_listings = diff(&current, &seen);
        if new_listings.is_empty() {
            auction_info!("No new listings");
            return Ok(RunReport {
                current,
                new_listings,
                persisted: false,
                notify_failures: 0,
            });
        }

        auction_info!("New listings detected: {}", new_listings.len());
        for listing in &new_listings {
            auction_info!("NEW: {}", listing);
        }

        if options.dry_run {
            auction_info!("Dry run: skipping notification and persistence");
            return Ok(RunReport {
                current,
                new_listings,
                persisted: false,
                notify_failures: 0,
            });
        }

        if self.notifiers.is_empty() {
            auction_warn!("No notification channels configured; new listings are only logged");
        }
        let notify_failures = dispatch(&self.notifiers, &new_listings).await;

        let persisted = match self.store.save(&current) {
            Ok(_) => true,
            Err(err) => {
                auction_error!("Failed to save seen listings: {}", err);
                false
            }
        };

        Ok(RunReport {
            current,
            new_listings,
            persisted,
            notify_failures,
        })
    }
}
