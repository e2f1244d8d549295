use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use auction_core::{seen_ids, Listing, SeenRecord};
use auction_logging::{auction_debug, auction_info, auction_warn};
use serde_json::Value;
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

pub const DEFAULT_SEEN_FILE: &str = "seen_listings.json";

#[derive(Debug, Error)]
pub enum SeenStoreError {
    #[error("seen store {0} does not exist")]
    Missing(PathBuf),
    #[error("failed to read seen store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("seen store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seen store {0} does not hold a JSON array")]
    NotAnArray(PathBuf),
    #[error("failed to serialize seen listings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write seen store: {0}")]
    Write(#[from] PersistError),
}

/// JSON file holding the listings seen by the last run that found something new.
///
/// The file is an array of `{"id", "title", "url"}` records. Bare id strings
/// from older files are accepted on read.
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifiers of previously seen listings.
    ///
    /// A missing or unreadable store is treated as empty so the run proceeds
    /// with every listing counted as new.
    pub fn load(&self) -> HashSet<String> {
        match self.load_records() {
            Ok(records) => {
                let ids = seen_ids(&records);
                auction_info!("Loaded {} seen listing id(s) from {:?}", ids.len(), self.path);
                ids
            }
            Err(SeenStoreError::Missing(path)) => {
                auction_info!("No seen store at {:?}; starting from an empty set", path);
                HashSet::new()
            }
            Err(err) => {
                auction_warn!("{}; treating seen set as empty", err);
                HashSet::new()
            }
        }
    }

    pub fn load_records(&self) -> Result<Vec<SeenRecord>, SeenStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SeenStoreError::Missing(self.path.clone()));
            }
            Err(source) => {
                return Err(SeenStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|source| SeenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        let Value::Array(entries) = value else {
            return Err(SeenStoreError::NotAnArray(self.path.clone()));
        };

        Ok(entries.into_iter().filter_map(record_from_entry).collect())
    }

    /// Replace the store with exactly `listings`. Nothing is merged with the
    /// previous content.
    pub fn save(&self, listings: &[Listing]) -> Result<PathBuf, SeenStoreError> {
        let records: Vec<SeenRecord> = listings.iter().map(SeenRecord::from).collect();
        let content = serde_json::to_string_pretty(&records)?;
        write_atomically(&self.path, &content)?;
        auction_info!("Saved {} listing(s) to {:?}", records.len(), self.path);
        Ok(self.path.clone())
    }
}

fn record_from_entry(entry: Value) -> Option<SeenRecord> {
    match entry {
        Value::String(id) => Some(SeenRecord::bare(id)),
        Value::Number(id) => Some(SeenRecord::bare(id.to_string())),
        Value::Object(mut fields) => {
            // Older stores wrote numeric ids.
            if let Some(Value::Number(id)) = fields.get("id") {
                let id = Value::String(id.to_string());
                fields.insert("id".to_string(), id);
            }
            match serde_json::from_value::<SeenRecord>(Value::Object(fields)) {
                Ok(record) => Some(record),
                Err(err) => {
                    auction_debug!("Skipping malformed seen record: {}", err);
                    None
                }
            }
        }
        other => {
            auction_debug!("Skipping seen entry of unexpected shape: {}", other);
            None
        }
    }
}
