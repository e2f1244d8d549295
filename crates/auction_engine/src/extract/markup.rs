use std::collections::HashSet;

use auction_core::{collapse_whitespace, Listing};
use auction_logging::auction_debug;
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::ExtractStrategy;

const CARD_ANCHORS: &str = r#"a[class*="card"], a[class*="Card"], a[data-testid*="card"]"#;
const CARD_INFO: &str =
    r#"[class*="card-info"], [class*="CardInfo"], [data-testid*="card-info"]"#;

/// Reads rendered listing cards straight from the markup.
///
/// Primary pass: anchors carrying a card class or test id. Secondary pass,
/// only when the primary one finds nothing: card-info containers, taking the
/// href of their nearest enclosing anchor.
#[derive(Debug, Clone)]
pub struct MarkupCardStrategy {
    card_anchors: Option<Selector>,
    card_info: Option<Selector>,
}

impl Default for MarkupCardStrategy {
    fn default() -> Self {
        Self {
            card_anchors: Selector::parse(CARD_ANCHORS).ok(),
            card_info: Selector::parse(CARD_INFO).ok(),
        }
    }
}

impl ExtractStrategy for MarkupCardStrategy {
    fn name(&self) -> &'static str {
        "markup-cards"
    }

    fn try_extract(&self, content: &str, base: &Url) -> Option<Vec<Listing>> {
        let doc = Html::parse_document(content);
        let mut layout_present = false;

        if let Some(sel) = self.card_anchors.as_ref() {
            let anchors: Vec<ElementRef> = doc.select(sel).collect();
            layout_present |= !anchors.is_empty();
            let listings = collect_unique(anchors.into_iter().filter_map(|anchor| {
                listing_from_parts(&visible_text(anchor), anchor.value().attr("href"), base)
            }));
            if !listings.is_empty() {
                return Some(listings);
            }
        }

        if let Some(sel) = self.card_info.as_ref() {
            let containers: Vec<ElementRef> = doc.select(sel).collect();
            layout_present |= !containers.is_empty();
            auction_debug!("Falling back to {} card-info container(s)", containers.len());
            let listings = collect_unique(containers.into_iter().filter_map(|info| {
                let anchor = enclosing_anchor(*info)?;
                listing_from_parts(&visible_text(info), anchor.value().attr("href"), base)
            }));
            if !listings.is_empty() {
                return Some(listings);
            }
        }

        layout_present.then(Vec::new)
    }
}

fn collect_unique(listings: impl Iterator<Item = Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    listings
        .filter(|listing| seen.insert(listing.id().to_string()))
        .collect()
}

fn visible_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// The node itself when it is an anchor, otherwise its closest `<a>` ancestor.
fn enclosing_anchor(node: NodeRef<'_, Node>) -> Option<ElementRef<'_>> {
    std::iter::once(node)
        .chain(node.ancestors())
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name().eq_ignore_ascii_case("a"))
}

fn listing_from_parts(title: &str, href: Option<&str>, base: &Url) -> Option<Listing> {
    if title.is_empty() {
        return None;
    }
    let url = resolve_url(href?, base)?;
    let id = last_path_segment(&url)?;
    Listing::new(id, title, url.as_str()).ok()
}

fn resolve_url(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
        return None;
    }
    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => base.join(trimmed).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn last_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.boligsiden.dk").unwrap()
    }

    #[test]
    fn relative_href_is_resolved_and_trailing_slash_ignored() {
        let url = resolve_url("/tvangsauktioner/bolig/abc-123/", &base()).unwrap();
        assert_eq!(url.as_str(), "https://www.boligsiden.dk/tvangsauktioner/bolig/abc-123/");
        assert_eq!(last_path_segment(&url).as_deref(), Some("abc-123"));
    }

    #[test]
    fn non_navigational_hrefs_are_rejected() {
        for href in ["", "  ", "#top", "?page=2", "javascript:void(0)", "mailto:a@b.dk"] {
            assert!(resolve_url(href, &base()).is_none(), "{href:?}");
        }
    }

    #[test]
    fn root_url_has_no_id() {
        let url = resolve_url("https://www.boligsiden.dk/", &base()).unwrap();
        assert_eq!(last_path_segment(&url), None);
    }
}
