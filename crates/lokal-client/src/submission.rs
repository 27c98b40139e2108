//! Listing submission form and rejection decoding.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Text fields of a new listing, flattened into multipart parts.
///
/// Location fields are canonical ids. Image parts are supplied separately.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    /// Free-form amount; blank means "contact for price".
    pub price: Option<String>,
    pub category: Option<i64>,
    pub condition: Option<String>,
    pub property_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub area_sqm: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub province: Option<i64>,
    pub municipality: Option<i64>,
    pub barangay: Option<i64>,
    pub is_province_wide: bool,
}

impl ListingForm {
    /// Returns the non-blank fields as `(name, value)` pairs.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut out: Vec<(&'static str, String)> = Vec::new();
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(v) = value {
                let v = v.trim();
                if !v.is_empty() {
                    out.push((name, v.to_owned()));
                }
            }
        };

        push("title", Some(self.title.clone()));
        push("description", Some(self.description.clone()));
        push("price", self.price.clone());
        push("category", self.category.map(|v| v.to_string()));
        push("condition", self.condition.clone());
        push("property_type", self.property_type.clone());
        push("vehicle_type", self.vehicle_type.clone());
        push("area_sqm", self.area_sqm.clone());
        push("bedrooms", self.bedrooms.map(|v| v.to_string()));
        push("bathrooms", self.bathrooms.map(|v| v.to_string()));
        push("province", self.province.map(|v| v.to_string()));
        push("municipality", self.municipality.map(|v| v.to_string()));
        push("barangay", self.barangay.map(|v| v.to_string()));
        if self.is_province_wide {
            push("is_province_wide", Some("true".to_owned()));
        }
        out
    }
}

/// The service's response to a successful `POST /listings`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedListing {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
}

/// Decodes a 400 body into field → messages.
///
/// Lists are kept as-is, scalars become one-element lists, and a body that
/// is not a JSON object is reported under `detail`.
pub(crate) fn parse_rejection(body: &str) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => {
            for (field, value) in map {
                let messages = match value {
                    serde_json::Value::Array(items) => items.into_iter().map(message_text).collect(),
                    other => vec![message_text(other)],
                };
                fields.insert(field, messages);
            }
        }
        _ => {
            fields.insert("detail".to_owned(), vec![body.trim().to_owned()]);
        }
    }
    fields
}

fn message_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
