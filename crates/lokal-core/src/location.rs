use serde::{Deserialize, Serialize};

use crate::slug::{slugs_match, to_slug};

/// Level of a unit in the province → municipality → barangay hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Province,
    Municipality,
    Barangay,
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationKind::Province => write!(f, "province"),
            LocationKind::Municipality => write!(f, "municipality"),
            LocationKind::Barangay => write!(f, "barangay"),
        }
    }
}

/// A canonical directory entry for a province, municipality, or barangay.
///
/// `slug` is unique only within the same parent and kind. Barangays carry
/// no geocode in the directory, so `geocode` is empty for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub geocode: String,
    pub kind: LocationKind,
    pub parent_id: Option<i64>,
}

impl LocationRecord {
    /// Builds a record whose slug is derived from `name`.
    #[must_use]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        geocode: impl Into<String>,
        kind: LocationKind,
        parent_id: Option<i64>,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            slug: to_slug(&name),
            name,
            geocode: geocode.into(),
            kind,
            parent_id,
        }
    }

    /// Returns the geocode, or `None` when the directory did not issue one.
    #[must_use]
    pub fn geocode(&self) -> Option<&str> {
        let code = self.geocode.trim();
        (!code.is_empty()).then_some(code)
    }

    /// Returns `true` if a URL segment refers to this record.
    ///
    /// Matches the directory-issued slug first and falls back to the slug
    /// derived from the name, case-insensitively.
    #[must_use]
    pub fn matches_slug(&self, segment: &str) -> bool {
        slugs_match(segment, &self.slug) || slugs_match(segment, &self.name)
    }
}
