//! Listing and announcement query parameters.
//!
//! Location filters come from a [`ResolvedLocation`]; everything else from
//! the page's filter input. No parameter is ever sent with a blank value.
//!
//! The two queries key location differently. Listings take the province
//! geocode (falling back to its display name) and the municipality geocode.
//! Announcements take canonical numeric ids only and drop any location
//! level that did not resolve.

use std::collections::btree_map;
use std::collections::BTreeMap;

use lokal_location::ResolvedLocation;

/// Flattened, service-ready query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` trimmed. Blank values are skipped; returns whether
    /// the key was set.
    pub fn insert(&mut self, key: &str, value: impl AsRef<str>) -> bool {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return false;
        }
        self.0.insert(key.to_owned(), value.to_owned());
        true
    }

    pub fn insert_opt<V: AsRef<str>>(&mut self, key: &str, value: Option<V>) -> bool {
        value.is_some_and(|v| self.insert(key, v))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Listing filter input as typed by the user. Read-only to the assembler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub category: String,
    pub property_type: String,
    pub vehicle_type: String,
    pub min_price: String,
    pub max_price: String,
    /// Free-text barangay, applied only together with a municipality filter.
    pub barangay: String,
    pub province_wide: bool,
    pub ordering: String,
    pub page: Option<u32>,
}

/// Announcement filter input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementFilters {
    pub search: String,
    pub priority: String,
    pub announcement_type: String,
    pub province_wide: bool,
    pub include_expired: bool,
    pub page: Option<u32>,
}

/// Builds the `GET /listings` parameters.
///
/// - `province`: the canonical geocode when the province resolved, else
///   its display name.
/// - `municipality`: the canonical geocode, only for a resolved
///   municipality and only when `province_wide` is off. A fallback name is
///   never sent.
/// - `barangay`: the filter text, or the resolved barangay's name, only
///   alongside a municipality filter.
#[must_use]
pub fn build_listing_query(location: &ResolvedLocation, filters: &FilterState) -> QueryParams {
    let mut params = QueryParams::new();

    match location.province_record() {
        Some(province) => {
            params.insert("province", province.geocode().unwrap_or(province.name.as_str()));
        }
        None => {
            params.insert("province", location.display_province());
        }
    }

    let municipality_set = !filters.province_wide
        && params.insert_opt(
            "municipality",
            location.municipality_record().and_then(|m| m.geocode()),
        );
    if location.has_municipality() && !municipality_set && !filters.province_wide {
        tracing::debug!(
            municipality = location.display_municipality().unwrap_or_default(),
            "municipality unresolved, omitting municipality filter"
        );
    }
    if municipality_set && !params.insert("barangay", &filters.barangay) {
        params.insert_opt("barangay", location.barangay_record().map(|b| b.name.as_str()));
    }

    params.insert("search", &filters.search);
    params.insert("category", &filters.category);
    params.insert("property_type", &filters.property_type);
    params.insert("vehicle_type", &filters.vehicle_type);
    params.insert("min_price", &filters.min_price);
    params.insert("max_price", &filters.max_price);
    params.insert("ordering", &filters.ordering);
    params.insert_opt("page", filters.page.map(|p| p.to_string()));
    params
}

/// Builds the `GET /announcements` parameters.
///
/// Location levels are sent as canonical numeric ids only. An unresolved
/// level is omitted, and `province_wide` drops everything below province.
#[must_use]
pub fn build_announcement_query(
    location: &ResolvedLocation,
    filters: &AnnouncementFilters,
) -> QueryParams {
    let mut params = QueryParams::new();

    let province_set = params.insert_opt("province", location.province_record().map(|p| p.id.to_string()));
    if !province_set {
        tracing::debug!(
            province = location.display_province(),
            "province unresolved, announcements are not location-filtered"
        );
    }
    if province_set && !filters.province_wide {
        let municipality_set = params.insert_opt(
            "municipality",
            location.municipality_record().map(|m| m.id.to_string()),
        );
        if municipality_set {
            params.insert_opt("barangay", location.barangay_record().map(|b| b.id.to_string()));
        }
    }

    params.insert("search", &filters.search);
    params.insert("priority", &filters.priority);
    params.insert("announcement_type", &filters.announcement_type);
    if filters.include_expired {
        params.insert("include_expired", "true");
    }
    params.insert_opt("page", filters.page.map(|p| p.to_string()));
    params
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
