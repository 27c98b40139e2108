//! Wire types for the directory/listing service.

use chrono::{DateTime, Utc};
use lokal_core::{to_slug, LocationKind, LocationRecord};
use serde::{Deserialize, Deserializer};

/// One row from `GET /provinces`, `GET /provinces/{slug}/municipalities`,
/// or `GET /barangays`.
///
/// Barangay rows carry only `id` and `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "psgc_code")]
    pub geocode: Option<String>,
}

impl DirectoryEntry {
    /// Converts the row into a canonical record.
    ///
    /// Keeps the service-issued slug when present; otherwise derives it
    /// from the name.
    #[must_use]
    pub fn into_record(self, kind: LocationKind, parent_id: Option<i64>) -> LocationRecord {
        let slug = self
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| to_slug(&self.name));
        LocationRecord {
            id: self.id,
            name: self.name,
            slug,
            geocode: self.geocode.unwrap_or_default(),
            kind,
            parent_id,
        }
    }
}

/// A list endpoint body: either a bare JSON array or a paginated
/// `{ "results": [...], "count": n }` wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
    },
}

/// A normalized page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Total matches on the service side. Equals `results.len()` for bare
    /// array responses.
    pub count: u64,
    pub has_next: bool,
}

impl<T> From<ListResponse<T>> for Page<T> {
    fn from(response: ListResponse<T>) -> Self {
        match response {
            ListResponse::Bare(results) => Page {
                count: results.len() as u64,
                results,
                has_next: false,
            },
            ListResponse::Paginated {
                results,
                count,
                next,
            } => Page {
                count: count.unwrap_or(results.len() as u64),
                results,
                has_next: next.is_some(),
            },
        }
    }
}

impl<T> ListResponse<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(results) | ListResponse::Paginated { results, .. } => results,
        }
    }
}

/// A listing row as returned by `GET /listings`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingSummary {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub price: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub province_name: Option<String>,
    #[serde(default)]
    pub municipality_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An announcement row as returned by `GET /announcements`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub announcement_type: Option<String>,
    #[serde(default)]
    pub is_province_wide: bool,
    #[serde(default)]
    pub province_name: Option<String>,
    #[serde(default)]
    pub municipality_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accepts a decimal amount sent either as a JSON string or number.
fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_accepts_bare_array() {
        let body = r#"[{"id": 1, "title": "Lot for sale"}]"#;
        let parsed: ListResponse<ListingSummary> = serde_json::from_str(body).unwrap();
        let page = Page::from(parsed);
        assert_eq!(page.count, 1);
        assert!(!page.has_next);
        assert_eq!(page.results[0].title, "Lot for sale");
    }

    #[test]
    fn list_response_accepts_empty_bare_array() {
        let parsed: ListResponse<ListingSummary> = serde_json::from_str("[]").unwrap();
        let page = Page::from(parsed);
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn list_response_accepts_paginated_wrapper() {
        let body = r#"{"count": 42, "next": "http://x/listings?page=2", "previous": null,
                       "results": [{"id": 3, "title": "Toyota Vios", "price": "450000.00"}]}"#;
        let parsed: ListResponse<ListingSummary> = serde_json::from_str(body).unwrap();
        let page = Page::from(parsed);
        assert_eq!(page.count, 42);
        assert!(page.has_next);
        assert_eq!(page.results[0].price.as_deref(), Some("450000.00"));
    }

    #[test]
    fn price_accepts_numbers_and_blank_strings() {
        let a: ListingSummary = serde_json::from_str(r#"{"id":1,"title":"a","price":1500}"#).unwrap();
        assert_eq!(a.price.as_deref(), Some("1500"));
        let b: ListingSummary = serde_json::from_str(r#"{"id":1,"title":"b","price":""}"#).unwrap();
        assert_eq!(b.price, None);
        let c: ListingSummary = serde_json::from_str(r#"{"id":1,"title":"c","price":null}"#).unwrap();
        assert_eq!(c.price, None);
    }

    #[test]
    fn directory_entry_keeps_service_slug() {
        let entry: DirectoryEntry = serde_json::from_str(
            r#"{"id": 5, "name": "Davao del Norte", "slug": "davao-del-norte", "geocode": "112300000"}"#,
        )
        .unwrap();
        let rec = entry.into_record(LocationKind::Province, None);
        assert_eq!(rec.slug, "davao-del-norte");
        assert_eq!(rec.geocode, "112300000");
        assert_eq!(rec.kind, LocationKind::Province);
    }

    #[test]
    fn directory_entry_derives_missing_slug_and_reads_psgc_alias() {
        let entry: DirectoryEntry =
            serde_json::from_str(r#"{"id": 9, "name": "Santo Niño", "psgc_code": "076101001"}"#).unwrap();
        let rec = entry.into_record(LocationKind::Barangay, Some(4));
        assert_eq!(rec.slug, "santo-nino");
        assert_eq!(rec.geocode, "076101001");
        assert_eq!(rec.parent_id, Some(4));
    }
}
