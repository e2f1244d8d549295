use std::collections::HashSet;

use auction_core::Listing;
use auction_logging::{auction_debug, auction_warn};
use serde_json::{Map, Value};
use url::Url;

use super::ExtractStrategy;

/// Escaped `"foreclosure":[` as it appears inside the server-rendered payload.
const FORECLOSURE_MARKER: &str = r#"\"foreclosure\":["#;
const DEFAULT_WINDOW_BYTES: usize = 100_000;

/// Reads the foreclosure array that the server embeds as an escaped JSON
/// literal in the page.
///
/// The window after the marker is a heuristic cut, so only the first JSON
/// value is decoded and whatever follows the closing bracket is ignored.
#[derive(Debug, Clone)]
pub struct EmbeddedDataStrategy {
    window_bytes: usize,
}

impl EmbeddedDataStrategy {
    pub fn with_window(window_bytes: usize) -> Self {
        Self { window_bytes }
    }
}

impl Default for EmbeddedDataStrategy {
    fn default() -> Self {
        Self::with_window(DEFAULT_WINDOW_BYTES)
    }
}

impl ExtractStrategy for EmbeddedDataStrategy {
    fn name(&self) -> &'static str {
        "embedded-data"
    }

    fn try_extract(&self, content: &str, base: &Url) -> Option<Vec<Listing>> {
        let marker_at = content.find(FORECLOSURE_MARKER)?;
        // Keep the opening bracket.
        let array_start = marker_at + FORECLOSURE_MARKER.len() - 1;
        let window = bounded_window(&content[array_start..], self.window_bytes);
        let unescaped = window.replace("\\\"", "\"").replace("\\\\", "\\");

        let items = match decode_first_value(&unescaped) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                auction_warn!("Foreclosure data is not an array (found {})", kind_of(&other));
                return Some(Vec::new());
            }
            Err(err) => {
                auction_warn!("Failed to parse foreclosure data: {}", err);
                return Some(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let listings = items
            .iter()
            .filter_map(|item| match item {
                Value::Object(fields) => listing_from_fields(fields, base),
                _ => None,
            })
            .filter(|listing| seen.insert(listing.id().to_string()))
            .collect();
        Some(listings)
    }
}

/// Longest prefix of `text` not exceeding `max_bytes`, cut on a char boundary.
fn bounded_window(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn decode_first_value(text: &str) -> Result<Value, serde_json::Error> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(value) => value,
        None => Err(serde::de::Error::custom("no JSON value after marker")),
    }
}

fn listing_from_fields(fields: &Map<String, Value>, base: &Url) -> Option<Listing> {
    let address_id = id_field(fields, "addressID");
    let address = string_field(fields, "addressFreetext");
    if address_id.is_empty() || address.trim().is_empty() {
        auction_debug!("Skipping foreclosure entry without address id or text");
        return None;
    }
    let address_type = string_field(fields, "boligsidenAddressType");
    let auction_at = string_field(fields, "auctionDatetime");

    let mut title = format!("{address_type}: {address}");
    if !auction_at.is_empty() {
        let date = auction_at.split('T').next().unwrap_or(auction_at);
        title.push_str(&format!(" (Auktion: {date})"));
    }
    let url = format!(
        "{}/tvangsauktioner/bolig/{}",
        base.as_str().trim_end_matches('/'),
        address_id
    );
    Listing::new(address_id, title, url).ok()
}

/// Identifier fields arrive as strings or as bare numbers.
fn id_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(id)) => id.trim().to_string(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

/// String value of `key`; missing or non-string values read as empty.
fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or("")
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
