use std::collections::HashSet;
use std::fs;

use auction_core::{diff, Listing, SeenRecord};
use auction_engine::{SeenStore, SeenStoreError};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn listing(id: &str) -> Listing {
    Listing::new(
        id,
        format!("Villa: Vej {id}"),
        format!("https://www.boligsiden.dk/tvangsauktioner/bolig/{id}"),
    )
    .unwrap()
}

fn id_set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn missing_store_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("seen_listings.json"));

    assert!(store.load().is_empty());
    assert!(matches!(store.load_records(), Err(SeenStoreError::Missing(_))));
}

#[test]
fn first_run_diff_against_missing_store_is_everything() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("seen_listings.json"));
    let current = vec![listing("1"), listing("2")];

    assert_eq!(diff(&current, &store.load()), current);
}

#[test]
fn save_then_load_round_trips_ids() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("seen_listings.json"));
    let listings = vec![listing("123"), listing("456"), listing("789")];

    store.save(&listings).unwrap();
    assert_eq!(store.load(), id_set(&["123", "456", "789"]));
}

#[test]
fn save_replaces_previous_content_instead_of_merging() {
    let temp = TempDir::new().unwrap();
    let store = SeenStore::new(temp.path().join("seen_listings.json"));

    store.save(&[listing("old"), listing("kept")]).unwrap();
    store.save(&[listing("kept"), listing("new")]).unwrap();

    assert_eq!(store.load(), id_set(&["kept", "new"]));
}

#[test]
fn saved_file_is_array_of_records() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("seen_listings.json");
    let store = SeenStore::new(&path);

    let written = store.save(&[listing("123")]).unwrap();
    assert_eq!(written, path);

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": "123",
            "title": "Villa: Vej 123",
            "url": "https://www.boligsiden.dk/tvangsauktioner/bolig/123"
        }])
    );
}

#[test]
fn legacy_and_mixed_entries_are_accepted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seen_listings.json");
    fs::write(
        &path,
        r#"["legacy-1", {"id": "2", "title": "Villa"}, {"title": "no id"}, 7, {"id": 8}, null, true]"#,
    )
    .unwrap();
    let store = SeenStore::new(&path);

    assert_eq!(
        store.load_records().unwrap(),
        vec![
            SeenRecord::bare("legacy-1"),
            SeenRecord {
                id: "2".to_string(),
                title: Some("Villa".to_string()),
                url: None,
            },
            SeenRecord::bare("7"),
            SeenRecord::bare("8"),
        ]
    );
    assert_eq!(store.load(), id_set(&["legacy-1", "2", "7", "8"]));
}

#[test]
fn corrupt_store_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seen_listings.json");
    fs::write(&path, "[{\"id\": \"1\"").unwrap();
    let store = SeenStore::new(&path);

    assert!(matches!(store.load_records(), Err(SeenStoreError::Corrupt { .. })));
    assert!(store.load().is_empty());
}

#[test]
fn non_array_store_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seen_listings.json");
    fs::write(&path, r#"{"id": "1"}"#).unwrap();
    let store = SeenStore::new(&path);

    assert!(matches!(store.load_records(), Err(SeenStoreError::NotAnArray(_))));
    assert!(store.load().is_empty());
}

#[test]
fn write_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();
    let store = SeenStore::new(blocker.join("seen_listings.json"));

    let err = store.save(&[listing("1")]).unwrap_err();
    assert!(matches!(err, SeenStoreError::Write(_)));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
