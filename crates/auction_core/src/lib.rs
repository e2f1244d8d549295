//! Auction core: pure listing model, seen-set records and diffing.
mod diff;
mod listing;
mod seen;
mod text;

pub use diff::{current_ids_line, diff, CURRENT_IDS_PREFIX};
pub use listing::{Listing, ListingError};
pub use seen::{seen_ids, SeenRecord};
pub use text::collapse_whitespace;
