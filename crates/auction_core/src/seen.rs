use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Listing;

/// One persisted entry of the seen set.
///
/// Only `id` takes part in diffing; `title` and `url` are cached for humans
/// reading the store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SeenRecord {
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            url: None,
        }
    }
}

impl From<&Listing> for SeenRecord {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id().to_string(),
            title: Some(listing.title().to_string()),
            url: Some(listing.url().to_string()),
        }
    }
}

/// Identifier set of the given records; blank ids are dropped.
pub fn seen_ids(records: &[SeenRecord]) -> HashSet<String> {
    records
        .iter()
        .map(|record| record.id.trim())
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
