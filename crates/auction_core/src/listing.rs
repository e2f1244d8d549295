use std::fmt;
use std::hash::{Hash, Hasher};

use crate::text::collapse_whitespace;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("listing id must not be empty")]
    EmptyId,
}

/// One auction entry.
///
/// Identity is the `id` alone: two listings with the same id compare equal and
/// hash the same even if their title or url drifted between runs.
#[derive(Debug, Clone)]
pub struct Listing {
    id: String,
    title: String,
    url: String,
}

impl Listing {
    /// Builds a listing, trimming the id and collapsing whitespace in the title.
    pub fn new(
        id: impl Into<String>,
        title: impl AsRef<str>,
        url: impl Into<String>,
    ) -> Result<Self, ListingError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ListingError::EmptyId);
        }
        Ok(Self {
            id,
            title: collapse_whitespace(title.as_ref()),
            url: url.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PartialEq for Listing {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listing {}

impl Hash for Listing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.title, self.url)
    }
}
