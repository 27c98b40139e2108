//! The last province/municipality a user browsed, used as the default
//! location for new listings.
//!
//! Stored outside the directory key prefix so cache invalidation keeps it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use lokal_core::to_slug;

use crate::error::CacheError;
use crate::store::CacheStore;

const LAST_LOCATION_KEY: &str = "lokal.last_location";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastLocation {
    pub province_slug: String,
    #[serde(default)]
    pub municipality_slug: Option<String>,
}

impl LastLocation {
    /// Normalizes both slugs; a blank or `all` municipality becomes `None`.
    #[must_use]
    pub fn new(province: &str, municipality: Option<&str>) -> Self {
        let municipality_slug = municipality
            .map(to_slug)
            .filter(|slug| !slug.is_empty() && slug != "all");
        Self {
            province_slug: to_slug(province),
            municipality_slug,
        }
    }
}

#[derive(Clone)]
pub struct LastLocationStore {
    store: Arc<dyn CacheStore>,
}

impl std::fmt::Debug for LastLocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastLocationStore").finish_non_exhaustive()
    }
}

impl LastLocationStore {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Records `location` as the most recently used one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the record cannot be stored.
    pub async fn remember(&self, location: &LastLocation) -> Result<(), CacheError> {
        if location.province_slug.is_empty() {
            return Ok(());
        }
        let payload = serde_json::to_string(location).map_err(|source| CacheError::Corrupt {
            key: LAST_LOCATION_KEY.to_owned(),
            source,
        })?;
        self.store.save(LAST_LOCATION_KEY, &payload).await
    }

    /// Returns the remembered location. Unreadable records read as `None`.
    pub async fn recall(&self) -> Option<LastLocation> {
        let payload = match self.store.load(LAST_LOCATION_KEY).await {
            Ok(payload) => payload?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read last location");
                return None;
            }
        };
        match serde_json::from_str::<LastLocation>(&payload) {
            Ok(location) if !location.province_slug.is_empty() => Some(location),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "discarding unreadable last location");
                None
            }
        }
    }

    /// Forgets the remembered location.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot remove the record.
    pub async fn forget(&self) -> Result<(), CacheError> {
        self.store.remove(LAST_LOCATION_KEY).await
    }
}
