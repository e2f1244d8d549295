use auction_core::Listing;
use auction_engine::{
    EmbeddedDataStrategy, ExtractStrategy, ListingExtractor, MarkupCardStrategy, DEFAULT_BASE_URL,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use url::Url;

fn base() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap()
}

fn extractor() -> ListingExtractor {
    auction_logging::initialize_for_tests();
    ListingExtractor::new(base())
}

/// Serialize `foreclosures` the way the server embeds it: as a JSON string
/// literal inside a script payload, so every quote and backslash is escaped.
fn embedded_page(foreclosures: &Value) -> String {
    let payload = format!(
        r#"{{"props":{{"foreclosure":{},"total":{}}}}}"#,
        foreclosures,
        foreclosures.as_array().map_or(0, Vec::len)
    );
    let escaped = payload.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "<html><head><title>Tvangsauktioner</title></head><body><div id=\"root\"></div>\
         <script>self.__next_f.push([1,\"{escaped}\"])</script></body></html>"
    )
}

fn triples(listings: &[Listing]) -> Vec<(String, String, String)> {
    listings
        .iter()
        .map(|l| (l.id().to_string(), l.title().to_string(), l.url().to_string()))
        .collect()
}

const CARD_PAGE: &str = r#"
<html><body>
  <nav><a href="/om-os">Om os</a></nav>
  <a class="listing-card" href="/tvangsauktioner/bolig/aaa-111">
     <span>Villa</span>
     <span>Storegade   1, 6000 Kolding</span>
  </a>
  <a class="ListingCard_root" href="https://www.boligsiden.dk/tvangsauktioner/bolig/bbb-222/">
     Rækkehus:
     Lillegade 2
  </a>
  <a data-testid="search-card" href="/tvangsauktioner/bolig/aaa-111">Duplicate of first</a>
</body></html>
"#;

#[test]
fn embedded_scenario_builds_title_and_url() {
    let page = embedded_page(&json!([{
        "addressID": "123",
        "addressFreetext": "Main St 1",
        "boligsidenAddressType": "Villa",
        "auctionDatetime": "2024-05-01T10:00:00"
    }]));

    let listings = extractor().extract(&page);
    assert_eq!(
        triples(&listings),
        vec![(
            "123".to_string(),
            "Villa: Main St 1 (Auktion: 2024-05-01)".to_string(),
            "https://www.boligsiden.dk/tvangsauktioner/bolig/123".to_string()
        )]
    );
}

#[test]
fn embedded_strategy_returns_every_well_formed_object() {
    let page = embedded_page(&json!([
        {"addressID": "1", "addressFreetext": "A-vej 1", "boligsidenAddressType": "Villa"},
        {"addressID": "2", "addressFreetext": "B-vej \"2\"", "boligsidenAddressType": "Ejerlejlighed",
         "auctionDatetime": "2024-06-12T13:30:00.000Z"},
        {"addressID": "3", "addressFreetext": "C-vej\\3", "boligsidenAddressType": "Fritidshus"}
    ]));

    let listings = extractor().extract(&page);
    assert_eq!(
        listings.iter().map(Listing::title).collect::<Vec<_>>(),
        vec![
            "Villa: A-vej 1",
            "Ejerlejlighed: B-vej \"2\" (Auktion: 2024-06-12)",
            "Fritidshus: C-vej\\3",
        ]
    );
}

#[test]
fn embedded_strategy_skips_incomplete_and_non_object_entries() {
    let page = embedded_page(&json!([
        "just a string",
        42,
        {"addressID": "", "addressFreetext": "No id"},
        {"addressID": "9", "addressFreetext": ""},
        {"addressID": "10"},
        {"addressID": true, "addressFreetext": "Boolean id"},
        {"addressID": "12", "addressFreetext": "Kept", "boligsidenAddressType": "Villa"},
        {"addressID": "12", "addressFreetext": "Repeated", "boligsidenAddressType": "Villa"}
    ]));

    let listings = extractor().extract(&page);
    assert_eq!(triples(&listings).len(), 1);
    assert_eq!(listings[0].id(), "12");
    assert_eq!(listings[0].title(), "Villa: Kept");
}

#[test]
fn embedded_strategy_accepts_numeric_address_id() {
    let page = embedded_page(&json!([
        {"addressID": 11, "addressFreetext": "Numeric id", "boligsidenAddressType": "Villa",
         "auctionDatetime": "2024-05-01T10:00:00"},
        {"addressID": "12", "addressFreetext": "String id", "boligsidenAddressType": "Villa"}
    ]));

    let listings = extractor().extract(&page);
    assert_eq!(
        triples(&listings),
        vec![
            (
                "11".to_string(),
                "Villa: Numeric id (Auktion: 2024-05-01)".to_string(),
                "https://www.boligsiden.dk/tvangsauktioner/bolig/11".to_string()
            ),
            (
                "12".to_string(),
                "Villa: String id".to_string(),
                "https://www.boligsiden.dk/tvangsauktioner/bolig/12".to_string()
            ),
        ]
    );
}

#[test]
fn markup_strategy_used_when_no_marker() {
    let listings = extractor().extract(CARD_PAGE);
    assert_eq!(
        triples(&listings),
        vec![
            (
                "aaa-111".to_string(),
                "Villa Storegade 1, 6000 Kolding".to_string(),
                "https://www.boligsiden.dk/tvangsauktioner/bolig/aaa-111".to_string()
            ),
            (
                "bbb-222".to_string(),
                "Rækkehus: Lillegade 2".to_string(),
                "https://www.boligsiden.dk/tvangsauktioner/bolig/bbb-222/".to_string()
            ),
        ]
    );
}

#[test]
fn malformed_embedded_data_falls_through_to_markup() {
    let truncated = r#"\"foreclosure\":[{\"addressID\":\"123\",\"addressFreetext\":\"Main"#;
    let page = CARD_PAGE.replace("<body>", &format!("<body><script>{truncated}</script>"));

    let strategy = EmbeddedDataStrategy::default();
    assert_eq!(strategy.try_extract(&page, &base()), Some(Vec::new()));

    let listings = extractor().extract(&page);
    assert_eq!(
        listings.iter().map(Listing::id).collect::<Vec<_>>(),
        vec!["aaa-111", "bbb-222"]
    );
}

#[test]
fn empty_embedded_array_falls_through_to_markup() {
    let page = embedded_page(&json!([]));
    let page = page.replace(
        "<div id=\"root\"></div>",
        r#"<a class="card" href="/tvangsauktioner/bolig/x-1">Villa: X 1</a>"#,
    );
    let listings = extractor().extract(&page);
    assert_eq!(listings.iter().map(Listing::id).collect::<Vec<_>>(), vec!["x-1"]);
}

#[test]
fn card_info_containers_use_enclosing_anchor() {
    let page = r#"
    <html><body>
      <a href="/tvangsauktioner/bolig/ccc-333">
        <div><div class="card-info"><p>Villa</p><p>Havnegade 3</p></div></div>
      </a>
      <a href="/tvangsauktioner/bolig/ddd-444">
        <section data-testid="listing-card-info">Ejerlejlighed: Torvet 4</section>
      </a>
      <div class="card-info">Orphan without anchor</div>
    </body></html>
    "#;

    let listings = extractor().extract(page);
    assert_eq!(
        triples(&listings),
        vec![
            (
                "ccc-333".to_string(),
                "Villa Havnegade 3".to_string(),
                "https://www.boligsiden.dk/tvangsauktioner/bolig/ccc-333".to_string()
            ),
            (
                "ddd-444".to_string(),
                "Ejerlejlighed: Torvet 4".to_string(),
                "https://www.boligsiden.dk/tvangsauktioner/bolig/ddd-444".to_string()
            ),
        ]
    );
}

#[test]
fn markup_strategy_reports_absent_layout() {
    let strategy = MarkupCardStrategy::default();
    assert_eq!(
        strategy.try_extract("<html><body><p>Ingen auktioner</p></body></html>", &base()),
        None
    );
}

#[test]
fn unrecognised_page_yields_nothing() {
    assert!(extractor().extract("").is_empty());
    assert!(extractor().extract("<<<not html").is_empty());
    assert!(extractor()
        .extract(r#"{"foreclosure":[{"addressID":"1"}]}"#)
        .is_empty());
}

struct FixedStrategy(&'static str);

impl ExtractStrategy for FixedStrategy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn try_extract(&self, _content: &str, base: &Url) -> Option<Vec<Listing>> {
        let url = base.join(&format!("/bolig/{}", self.0)).ok()?;
        Some(vec![Listing::new(self.0, "Fixed", url.as_str()).ok()?])
    }
}

#[test]
fn custom_strategies_run_in_given_order() {
    let extractor = ListingExtractor::with_strategies(
        base(),
        vec![
            Box::new(MarkupCardStrategy::default()),
            Box::new(FixedStrategy("first")),
            Box::new(FixedStrategy("second")),
        ],
    );
    let listings = extractor.extract("<p>nothing here</p>");
    assert_eq!(listings.iter().map(Listing::id).collect::<Vec<_>>(), vec!["first"]);
}
