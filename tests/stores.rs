//! Persistence tests for the saved list and listing snapshots.
//!
//! Each test works in its own directory under the system temp dir and
//! reopens the stores to check what actually reached disk.

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use wealthsage::listing::{CacheKey, Category, ListingSession, LoadState, Opportunity};
use wealthsage::storage::{SavedStore, SnapshotStore};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wealthsage_stores_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn opportunity(title: &str, source: &str) -> Opportunity {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "source": source,
        "link": "https://example.com/apply",
    }))
    .unwrap()
}

#[test]
fn test_saved_items_survive_reopen() {
    let dir = test_dir("saved_reopen");
    let path = dir.join("saved.json");
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

    let mut store = SavedStore::load(&path).unwrap();
    assert!(store.toggle(&opportunity("STEM Grant", "Fastweb"), now).unwrap());
    assert!(store.toggle(&opportunity("Hack Week", "MLH"), now).unwrap());
    // Same title from another source is a different item
    assert!(store.toggle(&opportunity("STEM Grant", "Bold"), now).unwrap());

    let reopened = SavedStore::load(&path).unwrap();
    assert_eq!(reopened.len(), 3);
    assert!(reopened.is_saved(&opportunity("Hack Week", "MLH")));
    assert_eq!(reopened.items()[0].saved_at, now);

    let mut reopened = reopened;
    assert!(!reopened.toggle(&opportunity("Hack Week", "MLH"), now).unwrap());
    assert_eq!(SavedStore::load(&path).unwrap().len(), 2);
}

#[test]
fn test_snapshot_freshness_across_reopen() {
    let dir = test_dir("snapshot_reopen");
    let path = dir.join("snapshots.json");
    let written = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
    let items = vec![opportunity("A", "x"), opportunity("B", "y")];

    let mut store = SnapshotStore::load(&path, Duration::minutes(10)).unwrap();
    store.put("Scholarships", &items, written).unwrap();

    let store = SnapshotStore::load(&path, Duration::minutes(10)).unwrap();
    let fresh: Option<Vec<Opportunity>> =
        store.get_fresh_as("Scholarships", written + Duration::minutes(9));
    assert_eq!(fresh.map(|v| v.len()), Some(2));

    let stale: Option<Vec<Opportunity>> =
        store.get_fresh_as("Scholarships", written + Duration::minutes(10));
    assert!(stale.is_none());
}

#[test]
fn test_snapshot_seeds_session_cache() {
    let dir = test_dir("snapshot_seed");
    let path = dir.join("snapshots.json");
    let now = Utc::now();

    let mut store = SnapshotStore::load(&path, Duration::minutes(10)).unwrap();
    store
        .put("Freelancing", &vec![opportunity("Logo design", "Upwork")], now)
        .unwrap();

    let items: Vec<Opportunity> = store.get_fresh_as("Freelancing", now).unwrap();
    let mut session = ListingSession::new();
    session.prime(CacheKey::new(Category::Freelancing, ""), Arc::from(items));

    assert!(session.select(Category::Freelancing, "").is_none());
    assert_eq!(session.state(), LoadState::Ready);
    assert_eq!(session.displayed()[0].title, "Logo design");
}

#[test]
fn test_corrupt_saved_file_is_an_error() {
    let dir = test_dir("saved_corrupt");
    let path = dir.join("saved.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(SavedStore::load(&path).is_err());
}
