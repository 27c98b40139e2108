use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use lokal_core::{LocationKind, LocationRecord};

use super::*;
use crate::store::{CacheStore, MemoryStore};

fn siquijor() -> LocationRecord {
    LocationRecord::new(12, "Siquijor", "076100000", LocationKind::Province, None)
}

fn cache_over(store: &Arc<MemoryStore>) -> DirectoryCache {
    DirectoryCache::new(Arc::clone(store) as Arc<dyn CacheStore>)
}

#[tokio::test]
async fn fresh_entry_is_read_back() {
    let store = Arc::new(MemoryStore::new());
    let cache = cache_over(&store);
    cache.write(&[siquijor()]).await.unwrap();

    let entry = cache.read().await.expect("fresh entry should be readable");
    assert_eq!(entry.records, vec![siquijor()]);
    assert_eq!(entry.schema_version, DIRECTORY_SCHEMA_VERSION);
}

#[tokio::test]
async fn empty_store_reads_absent() {
    let store = Arc::new(MemoryStore::new());
    assert!(cache_over(&store).read().await.is_none());
}

#[tokio::test]
async fn entry_at_or_past_ttl_is_never_read() {
    let store = Arc::new(MemoryStore::new());
    let cache = cache_over(&store);
    let fetched = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    cache.write_at(&[siquijor()], fetched).await.unwrap();

    let just_before = fetched + TimeDelta::hours(DIRECTORY_TTL_HOURS) - TimeDelta::seconds(1);
    assert!(cache.read_at(just_before).await.is_some());

    let at_ttl = fetched + TimeDelta::hours(DIRECTORY_TTL_HOURS);
    assert!(cache.read_at(at_ttl).await.is_none());
    assert!(cache.read_at(at_ttl + TimeDelta::days(3)).await.is_none());
}

#[tokio::test]
async fn future_dated_entry_is_not_read() {
    let store = Arc::new(MemoryStore::new());
    let cache = cache_over(&store);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

    cache
        .write_at(&[siquijor()], now + TimeDelta::minutes(1))
        .await
        .unwrap();
    assert!(cache.read_at(now).await.is_some());

    cache
        .write_at(&[siquijor()], now + TimeDelta::hours(6))
        .await
        .unwrap();
    assert!(cache.read_at(now).await.is_none());
    assert!(cache.read_at(now + TimeDelta::hours(29)).await.is_none());
}

#[tokio::test]
async fn entry_from_another_schema_version_is_never_read() {
    let store = Arc::new(MemoryStore::new());
    let old = DirectoryCache::with_policy(
        Arc::clone(&store) as Arc<dyn CacheStore>,
        "lokal-directory-v0",
        TimeDelta::hours(DIRECTORY_TTL_HOURS),
    );
    old.write(&[siquijor()]).await.unwrap();

    let current = cache_over(&store);
    assert!(current.read().await.is_none());
    // Still in storage; only a write replaces it.
    assert_eq!(store.len(), 1);

    current.write(&[siquijor()]).await.unwrap();
    assert!(current.read().await.is_some());
    assert!(old.read().await.is_none());
}

#[tokio::test]
async fn corrupt_payload_reads_as_miss() {
    let store = Arc::new(MemoryStore::new());
    store
        .save("lokal.directory.provinces", "{not json")
        .await
        .unwrap();
    assert!(cache_over(&store).read().await.is_none());
}

#[tokio::test]
async fn oversized_payload_reads_as_miss() {
    let store = Arc::new(MemoryStore::new());
    let huge = "x".repeat(MAX_ENTRY_BYTES + 1);
    store.save("lokal.directory.provinces", &huge).await.unwrap();
    assert!(cache_over(&store).read().await.is_none());
}

#[tokio::test]
async fn municipality_and_barangay_entries_are_keyed_separately() {
    let store = Arc::new(MemoryStore::new());
    let cache = cache_over(&store);
    let tagum = LocationRecord::new(201, "City of Tagum", "112314000", LocationKind::Municipality, Some(11));
    let apokon = LocationRecord::new(9001, "Apokon", "", LocationKind::Barangay, Some(201));

    cache
        .write_municipalities(11, &[tagum.clone()])
        .await
        .unwrap();
    cache.write_barangays(201, &[apokon.clone()]).await.unwrap();

    assert_eq!(
        cache.read_municipalities(11).await.unwrap().records,
        vec![tagum]
    );
    assert!(cache.read_municipalities(12).await.is_none());
    assert_eq!(cache.read_barangays(201).await.unwrap().records, vec![apokon]);
    assert!(cache.read().await.is_none());
}

#[tokio::test]
async fn invalidate_clears_directory_entries_only() {
    let store = Arc::new(MemoryStore::new());
    let cache = cache_over(&store);
    cache.write(&[siquijor()]).await.unwrap();
    cache.write_municipalities(12, &[]).await.unwrap();
    store.save("lokal.last_location", "{}").await.unwrap();

    cache.invalidate().await.unwrap();

    assert!(cache.read().await.is_none());
    assert!(cache.read_municipalities(12).await.is_none());
    assert_eq!(store.len(), 1);
}
