//! Versioned, time-bounded cache of the location directory.
//!
//! Every entry carries the schema version it was written under and its
//! fetch time. An entry is readable only while both match the cache's
//! policy; anything else reads as absent and is left for the next write to
//! replace. Bumping [`DIRECTORY_SCHEMA_VERSION`] is how all clients are
//! forced to refetch.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use lokal_core::LocationRecord;

use crate::error::CacheError;
use crate::store::CacheStore;

/// Schema version written into every directory entry.
pub const DIRECTORY_SCHEMA_VERSION: &str = "lokal-directory-v1";

/// Maximum age of a readable directory entry.
pub const DIRECTORY_TTL_HOURS: i64 = 24;

/// How far in the future a `fetched_at` may lie before the entry is
/// treated as written under a skewed clock.
pub const MAX_CLOCK_SKEW_MINUTES: i64 = 5;

/// Payloads larger than this are treated as corrupt.
pub const MAX_ENTRY_BYTES: usize = 4 * 1024 * 1024;

pub(crate) const KEY_PREFIX: &str = "lokal.directory.";

fn provinces_key() -> String {
    format!("{KEY_PREFIX}provinces")
}

fn municipalities_key(province_id: i64) -> String {
    format!("{KEY_PREFIX}municipalities.{province_id}")
}

fn barangays_key(municipality_id: i64) -> String {
    format!("{KEY_PREFIX}barangays.{municipality_id}")
}

/// A persisted snapshot of one directory list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryCacheEntry {
    pub records: Vec<LocationRecord>,
    pub fetched_at: DateTime<Utc>,
    pub schema_version: String,
}

/// Process-wide directory cache over an injectable [`CacheStore`].
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct DirectoryCache {
    store: Arc<dyn CacheStore>,
    schema_version: String,
    ttl: TimeDelta,
}

impl std::fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("schema_version", &self.schema_version)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl DirectoryCache {
    /// Creates a cache using [`DIRECTORY_SCHEMA_VERSION`] and a
    /// [`DIRECTORY_TTL_HOURS`] expiry.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_policy(
            store,
            DIRECTORY_SCHEMA_VERSION,
            TimeDelta::hours(DIRECTORY_TTL_HOURS),
        )
    }

    /// Creates a cache with an explicit schema version and expiry.
    #[must_use]
    pub fn with_policy(
        store: Arc<dyn CacheStore>,
        schema_version: impl Into<String>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            store,
            schema_version: schema_version.into(),
            ttl,
        }
    }

    /// The underlying store, shared with other caches built on it.
    #[must_use]
    pub fn store(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Returns `true` if `entry` may be read at `now`.
    ///
    /// Entries stamped more than [`MAX_CLOCK_SKEW_MINUTES`] ahead of `now`
    /// are invalid.
    #[must_use]
    pub fn is_valid(&self, entry: &DirectoryCacheEntry, now: DateTime<Utc>) -> bool {
        let age = now - entry.fetched_at;
        entry.schema_version == self.schema_version
            && age < self.ttl
            && age > -TimeDelta::minutes(MAX_CLOCK_SKEW_MINUTES)
    }

    /// Returns the cached province list if it is valid now.
    pub async fn read(&self) -> Option<DirectoryCacheEntry> {
        self.read_at(Utc::now()).await
    }

    /// Returns the cached province list if it is valid at `now`.
    pub async fn read_at(&self, now: DateTime<Utc>) -> Option<DirectoryCacheEntry> {
        self.read_key(&provinces_key(), now).await
    }

    /// Replaces the cached province list, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be serialized or stored.
    pub async fn write(&self, records: &[LocationRecord]) -> Result<(), CacheError> {
        self.write_at(records, Utc::now()).await
    }

    /// Replaces the cached province list, stamped with `fetched_at`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be serialized or stored.
    pub async fn write_at(
        &self,
        records: &[LocationRecord],
        fetched_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.write_key(&provinces_key(), records, fetched_at).await
    }

    /// Returns the cached municipalities of a province if valid now.
    pub async fn read_municipalities(&self, province_id: i64) -> Option<DirectoryCacheEntry> {
        self.read_key(&municipalities_key(province_id), Utc::now())
            .await
    }

    /// Replaces the cached municipalities of a province.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be serialized or stored.
    pub async fn write_municipalities(
        &self,
        province_id: i64,
        records: &[LocationRecord],
    ) -> Result<(), CacheError> {
        self.write_key(&municipalities_key(province_id), records, Utc::now())
            .await
    }

    /// Returns the cached barangays of a municipality if valid now.
    pub async fn read_barangays(&self, municipality_id: i64) -> Option<DirectoryCacheEntry> {
        self.read_key(&barangays_key(municipality_id), Utc::now())
            .await
    }

    /// Replaces the cached barangays of a municipality.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be serialized or stored.
    pub async fn write_barangays(
        &self,
        municipality_id: i64,
        records: &[LocationRecord],
    ) -> Result<(), CacheError> {
        self.write_key(&barangays_key(municipality_id), records, Utc::now())
            .await
    }

    /// Removes every directory entry. Other keys in the store are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot remove an entry.
    pub async fn invalidate(&self) -> Result<(), CacheError> {
        tracing::debug!("invalidating directory cache");
        self.store.remove_prefix(KEY_PREFIX).await
    }

    async fn read_key(&self, key: &str, now: DateTime<Utc>) -> Option<DirectoryCacheEntry> {
        let entry = match self.load_entry(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::debug!(key, "directory cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable directory cache entry, treating as miss");
                return None;
            }
        };

        if entry.schema_version != self.schema_version {
            tracing::debug!(
                key,
                stored = %entry.schema_version,
                expected = %self.schema_version,
                "directory cache schema mismatch"
            );
            return None;
        }
        if !self.is_valid(&entry, now) {
            tracing::debug!(key, fetched_at = %entry.fetched_at, "directory cache entry expired");
            return None;
        }
        Some(entry)
    }

    async fn load_entry(&self, key: &str) -> Result<Option<DirectoryCacheEntry>, CacheError> {
        let Some(payload) = self.store.load(key).await? else {
            return Ok(None);
        };
        if payload.len() > MAX_ENTRY_BYTES {
            return Err(CacheError::Oversized {
                key: key.to_owned(),
                bytes: payload.len(),
                limit: MAX_ENTRY_BYTES,
            });
        }
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                key: key.to_owned(),
                source,
            })
    }

    async fn write_key(
        &self,
        key: &str,
        records: &[LocationRecord],
        fetched_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let entry = DirectoryCacheEntry {
            records: records.to_vec(),
            fetched_at,
            schema_version: self.schema_version.clone(),
        };
        let payload = serde_json::to_string(&entry).map_err(|source| CacheError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        if payload.len() > MAX_ENTRY_BYTES {
            return Err(CacheError::Oversized {
                key: key.to_owned(),
                bytes: payload.len(),
                limit: MAX_ENTRY_BYTES,
            });
        }
        self.store.save(key, &payload).await?;
        tracing::debug!(key, count = records.len(), "wrote directory cache entry");
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
