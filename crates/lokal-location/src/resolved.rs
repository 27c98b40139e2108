use lokal_core::{to_display, LocationRecord};

/// Outcome of resolving one URL slug.
///
/// `Fallback` carries only a display name derived from the slug. It is not
/// canonical and must never be used as an id or geocode filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(LocationRecord),
    Fallback { display_name: String },
}

impl Resolution {
    /// Builds a fallback from a URL slug.
    #[must_use]
    pub fn fallback(slug: &str) -> Self {
        Resolution::Fallback {
            display_name: to_display(slug),
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&LocationRecord> {
        match self {
            Resolution::Resolved(record) => Some(record),
            Resolution::Fallback { .. } => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Canonical name when resolved, otherwise the derived display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Resolution::Resolved(record) => &record.name,
            Resolution::Fallback { display_name } => display_name,
        }
    }
}

/// A page's view of where it is. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub province: Resolution,
    /// `None` when the route names no municipality (or `all`).
    pub municipality: Option<Resolution>,
    /// `None` when the route names no barangay.
    pub barangay: Option<Resolution>,
    /// Province directory, in service order. Empty if it could not be loaded.
    pub provinces: Vec<LocationRecord>,
    /// Municipalities of the resolved province. Empty if the province is
    /// unresolved or its list could not be loaded.
    pub municipalities: Vec<LocationRecord>,
    /// Barangays of the resolved municipality, when a barangay was requested.
    pub barangays: Vec<LocationRecord>,
}

impl ResolvedLocation {
    /// The fully degraded result: display names only, no directory lists.
    #[must_use]
    pub fn fallback(
        province_slug: &str,
        municipality_slug: Option<&str>,
        barangay_slug: Option<&str>,
    ) -> Self {
        Self {
            province: Resolution::fallback(province_slug),
            municipality: municipality_slug.map(Resolution::fallback),
            barangay: barangay_slug.map(Resolution::fallback),
            provinces: Vec::new(),
            municipalities: Vec::new(),
            barangays: Vec::new(),
        }
    }

    #[must_use]
    pub fn display_province(&self) -> &str {
        self.province.display_name()
    }

    #[must_use]
    pub fn display_municipality(&self) -> Option<&str> {
        self.municipality.as_ref().map(Resolution::display_name)
    }

    #[must_use]
    pub fn display_barangay(&self) -> Option<&str> {
        self.barangay.as_ref().map(Resolution::display_name)
    }

    #[must_use]
    pub fn province_record(&self) -> Option<&LocationRecord> {
        self.province.record()
    }

    #[must_use]
    pub fn municipality_record(&self) -> Option<&LocationRecord> {
        self.municipality.as_ref().and_then(Resolution::record)
    }

    #[must_use]
    pub fn barangay_record(&self) -> Option<&LocationRecord> {
        self.barangay.as_ref().and_then(Resolution::record)
    }

    /// `true` when the route selected a municipality, resolved or not.
    #[must_use]
    pub fn has_municipality(&self) -> bool {
        self.municipality.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokal_core::LocationKind;

    #[test]
    fn fallback_uses_title_cased_slug() {
        let loc = ResolvedLocation::fallback("davao-del-norte", Some("city-of-tagum"), None);
        assert_eq!(loc.display_province(), "Davao Del Norte");
        assert_eq!(loc.display_municipality(), Some("City Of Tagum"));
        assert!(loc.province_record().is_none());
        assert!(loc.municipality_record().is_none());
        assert!(loc.has_municipality());
        assert_eq!(loc.display_barangay(), None);
    }

    #[test]
    fn resolved_prefers_canonical_name() {
        let record = LocationRecord::new(11, "Davao del Norte", "112300000", LocationKind::Province, None);
        let resolution = Resolution::Resolved(record.clone());
        assert_eq!(resolution.display_name(), "Davao del Norte");
        assert_eq!(resolution.record(), Some(&record));
        assert!(resolution.is_resolved());
        assert!(!Resolution::fallback("x").is_resolved());
    }
}
