//! Turns URL slugs into canonical directory records.
//!
//! Resolution is single-flight per [`ResolutionKey`]: concurrent callers
//! for the same key share one in-flight computation and one set of
//! directory fetches. The table entry is removed when the computation
//! finishes, whatever its outcome. Directory fetch failures never surface
//! as errors; they degrade to [`Resolution::Fallback`] values.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

use lokal_client::ClientError;
use lokal_core::{to_slug, LocationRecord};

use crate::cache::DirectoryCache;
use crate::resolved::{Resolution, ResolvedLocation};
use crate::source::DirectorySource;

type SharedResolution = Shared<BoxFuture<'static, Arc<ResolvedLocation>>>;

/// Normalized identity of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub province: String,
    pub municipality: Option<String>,
    pub barangay: Option<String>,
}

impl ResolutionKey {
    /// Normalizes the slugs.
    ///
    /// A blank or `all` municipality means "no municipality". A barangay is
    /// only kept alongside a municipality.
    #[must_use]
    pub fn new(province: &str, municipality: Option<&str>, barangay: Option<&str>) -> Self {
        let municipality = municipality.map(to_slug).filter(|s| !s.is_empty() && s != "all");
        let barangay = municipality
            .as_ref()
            .and(barangay)
            .map(to_slug)
            .filter(|s| !s.is_empty());
        Self {
            province: to_slug(province),
            municipality,
            barangay,
        }
    }
}

impl std::fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.province)?;
        if let Some(m) = &self.municipality {
            write!(f, "/{m}")?;
        }
        if let Some(b) = &self.barangay {
            write!(f, "/{b}")?;
        }
        Ok(())
    }
}

/// Shared, cloneable location resolver.
#[derive(Clone)]
pub struct LocationResolver {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn DirectorySource>,
    cache: DirectoryCache,
    in_flight: Mutex<HashMap<ResolutionKey, SharedResolution>>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

impl LocationResolver {
    #[must_use]
    pub fn new(source: Arc<dyn DirectorySource>, cache: DirectoryCache) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                cache,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &DirectoryCache {
        &self.inner.cache
    }

    /// Resolves a province and optional municipality slug.
    pub async fn resolve(
        &self,
        province: &str,
        municipality: Option<&str>,
    ) -> Arc<ResolvedLocation> {
        self.resolve_key(ResolutionKey::new(province, municipality, None))
            .await
    }

    /// Resolves down to a barangay. The barangay is looked up only within
    /// the resolved municipality.
    pub async fn resolve_with_barangay(
        &self,
        province: &str,
        municipality: &str,
        barangay: &str,
    ) -> Arc<ResolvedLocation> {
        self.resolve_key(ResolutionKey::new(province, Some(municipality), Some(barangay)))
            .await
    }

    /// Resolves `key`, joining an in-flight resolution of the same key if
    /// there is one.
    ///
    /// The computation runs on its own task, so it completes and fills the
    /// cache even if every caller stops waiting.
    pub async fn resolve_key(&self, key: ResolutionKey) -> Arc<ResolvedLocation> {
        let shared = {
            let mut in_flight = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = in_flight.get(&key) {
                tracing::debug!(key = %key, "joining in-flight resolution");
                existing.clone()
            } else {
                let inner = Arc::clone(&self.inner);
                let task_key = key.clone();
                let fut = async move {
                    let resolved = Arc::new(inner.compute(&task_key).await);
                    inner
                        .in_flight
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(&task_key);
                    resolved
                }
                .boxed()
                .shared();
                in_flight.insert(key, fut.clone());
                tokio::spawn(fut.clone());
                fut
            }
        };
        shared.await
    }

    /// Number of resolutions currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The province directory, from cache or freshly fetched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the cache misses and the fetch fails.
    pub async fn provinces(&self) -> Result<Vec<LocationRecord>, ClientError> {
        self.inner.province_list().await
    }
}

struct ProvinceList {
    records: Vec<LocationRecord>,
    from_cache: bool,
}

fn find_slug(records: &[LocationRecord], slug: &str) -> Option<LocationRecord> {
    records.iter().find(|r| r.matches_slug(slug)).cloned()
}

impl Inner {
    async fn compute(&self, key: &ResolutionKey) -> ResolvedLocation {
        let mut provinces = match self.cached_or_fetched_provinces().await {
            Ok(listed) => listed,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "province directory unavailable, using fallback names");
                return ResolvedLocation::fallback(
                    &key.province,
                    key.municipality.as_deref(),
                    key.barangay.as_deref(),
                );
            }
        };

        let mut found = find_slug(&provinces.records, &key.province);
        if found.is_none() && provinces.from_cache {
            tracing::debug!(province = %key.province, "province not in cached directory, refetching");
            match self.fetch_provinces().await {
                Ok(records) => {
                    found = find_slug(&records, &key.province);
                    provinces.records = records;
                }
                Err(e) => {
                    tracing::warn!(province = %key.province, error = %e, "province directory refetch failed");
                }
            }
        }
        let provinces = provinces.records;

        let Some(province) = found else {
            tracing::warn!(province = %key.province, "province not in directory");
            return ResolvedLocation {
                provinces,
                ..ResolvedLocation::fallback(
                    &key.province,
                    key.municipality.as_deref(),
                    key.barangay.as_deref(),
                )
            };
        };

        let municipalities = match self.municipality_list(&province).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(province = %province.slug, error = %e, "municipality list unavailable");
                Vec::new()
            }
        };

        let municipality = key.municipality.as_deref().map(|slug| {
            municipalities
                .iter()
                .find(|m| m.matches_slug(slug))
                .cloned()
                .map_or_else(|| Resolution::fallback(slug), Resolution::Resolved)
        });

        let (barangay, barangays) = match (&municipality, key.barangay.as_deref()) {
            (Some(Resolution::Resolved(parent)), Some(slug)) => {
                let barangays = match self.barangay_list(parent).await {
                    Ok(list) => list,
                    Err(e) => {
                        tracing::warn!(municipality = %parent.slug, error = %e, "barangay list unavailable");
                        Vec::new()
                    }
                };
                let barangay = barangays
                    .iter()
                    .find(|b| b.matches_slug(slug))
                    .cloned()
                    .map_or_else(|| Resolution::fallback(slug), Resolution::Resolved);
                (Some(barangay), barangays)
            }
            (_, Some(slug)) => (Some(Resolution::fallback(slug)), Vec::new()),
            (_, None) => (None, Vec::new()),
        };

        tracing::debug!(key = %key, province_id = province.id, "resolved location");
        ResolvedLocation {
            province: Resolution::Resolved(province),
            municipality,
            barangay,
            provinces,
            municipalities,
            barangays,
        }
    }

    async fn province_list(&self) -> Result<Vec<LocationRecord>, ClientError> {
        self.cached_or_fetched_provinces()
            .await
            .map(|listed| listed.records)
    }

    async fn cached_or_fetched_provinces(&self) -> Result<ProvinceList, ClientError> {
        if let Some(entry) = self.cache.read().await {
            return Ok(ProvinceList {
                records: entry.records,
                from_cache: true,
            });
        }
        Ok(ProvinceList {
            records: self.fetch_provinces().await?,
            from_cache: false,
        })
    }

    /// Fetches the province directory and writes it through to the cache.
    async fn fetch_provinces(&self) -> Result<Vec<LocationRecord>, ClientError> {
        let records = self.source.provinces().await?;
        if let Err(e) = self.cache.write(&records).await {
            tracing::warn!(error = %e, "failed to cache province directory");
        }
        Ok(records)
    }

    async fn municipality_list(
        &self,
        province: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError> {
        if let Some(entry) = self.cache.read_municipalities(province.id).await {
            return Ok(entry.records);
        }
        let records = self.source.municipalities(province).await?;
        if let Err(e) = self.cache.write_municipalities(province.id, &records).await {
            tracing::warn!(province = %province.slug, error = %e, "failed to cache municipalities");
        }
        Ok(records)
    }

    async fn barangay_list(
        &self,
        municipality: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError> {
        if let Some(entry) = self.cache.read_barangays(municipality.id).await {
            return Ok(entry.records);
        }
        let records = self.source.barangays(municipality).await?;
        if let Err(e) = self.cache.write_barangays(municipality.id, &records).await {
            tracing::warn!(municipality = %municipality.slug, error = %e, "failed to cache barangays");
        }
        Ok(records)
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
