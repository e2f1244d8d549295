use std::collections::HashSet;

use crate::Listing;

/// Prefix of the summary line printed after every successful fetch.
pub const CURRENT_IDS_PREFIX: &str = "CURRENT_IDS=";

/// Listings of `current` whose id is absent from `seen`, in `current` order.
pub fn diff(current: &[Listing], seen: &HashSet<String>) -> Vec<Listing> {
    current
        .iter()
        .filter(|listing| !seen.contains(listing.id()))
        .cloned()
        .collect()
}

/// `CURRENT_IDS=<id>,<id>,...` in extraction order.
pub fn current_ids_line(current: &[Listing]) -> String {
    let ids: Vec<&str> = current.iter().map(Listing::id).collect();
    format!("{CURRENT_IDS_PREFIX}{}", ids.join(","))
}
