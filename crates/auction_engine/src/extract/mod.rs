//! Listing extraction as an ordered list of independent strategies.
//!
//! The page has shipped its inventory both as an escaped JSON array inside
//! generated markup and as plain rendered cards. Each layout gets its own
//! [`ExtractStrategy`]; [`ListingExtractor`] tries them in order and the first
//! non-empty result wins.
mod embedded;
mod markup;

use auction_core::Listing;
use auction_logging::{auction_debug, auction_info, auction_warn};
use url::Url;

pub use embedded::EmbeddedDataStrategy;
pub use markup::MarkupCardStrategy;

pub const DEFAULT_BASE_URL: &str = "https://www.boligsiden.dk";

pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the layout this strategy reads is absent from `content`,
    /// `Some` (possibly empty) when it was present.
    fn try_extract(&self, content: &str, base: &Url) -> Option<Vec<Listing>>;
}

pub struct ListingExtractor {
    base: Url,
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl ListingExtractor {
    /// Extractor with the default order: embedded data, then markup cards.
    pub fn new(base: Url) -> Self {
        Self::with_strategies(
            base,
            vec![
                Box::new(EmbeddedDataStrategy::default()),
                Box::new(MarkupCardStrategy::default()),
            ],
        )
    }

    pub fn with_strategies(base: Url, strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        Self { base, strategies }
    }

    /// Never fails: when no strategy yields anything the result is empty and
    /// a warning is logged.
    pub fn extract(&self, content: &str) -> Vec<Listing> {
        for strategy in &self.strategies {
            match strategy.try_extract(content, &self.base) {
                None => auction_debug!("{} layout not present", strategy.name()),
                Some(listings) if listings.is_empty() => {
                    auction_info!("{} layout present but yielded no listings", strategy.name());
                }
                Some(listings) => {
                    auction_info!(
                        "Extracted {} listing(s) with {} strategy",
                        listings.len(),
                        strategy.name()
                    );
                    return listings;
                }
            }
        }
        auction_warn!("No listings extracted by any strategy; the page layout may have changed");
        Vec::new()
    }
}
