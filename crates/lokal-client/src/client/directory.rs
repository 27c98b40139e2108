//! Province, municipality, and barangay directory endpoints.

use lokal_core::{LocationKind, LocationRecord};

use super::{BoardClient, NO_QUERY};
use crate::error::ClientError;
use crate::types::{DirectoryEntry, ListResponse};

impl BoardClient {
    /// Fetches the full province list (`GET /provinces`), in service order.
    ///
    /// # Errors
    ///
    /// Returns any [`ClientError`] from the request or body decoding.
    pub async fn list_provinces(&self) -> Result<Vec<LocationRecord>, ClientError> {
        let url = self.endpoint(&["provinces"], NO_QUERY);
        let body: ListResponse<DirectoryEntry> = self.get_json(url, "provinces").await?;
        let records: Vec<LocationRecord> = body
            .into_vec()
            .into_iter()
            .map(|entry| entry.into_record(LocationKind::Province, None))
            .collect();
        tracing::debug!(count = records.len(), "fetched province directory");
        Ok(records)
    }

    /// Fetches the municipalities of a province
    /// (`GET /provinces/{slug}/municipalities`).
    ///
    /// Records are parented to `province.id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the service does not know the
    /// province slug, or any other [`ClientError`] from the request.
    pub async fn list_municipalities(
        &self,
        province: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError> {
        let url = self.endpoint(&["provinces", province.slug.as_str(), "municipalities"], NO_QUERY);
        let context = format!("municipalities(province={})", province.slug);
        let body: ListResponse<DirectoryEntry> = self.get_json(url, &context).await?;
        Ok(body
            .into_vec()
            .into_iter()
            .map(|entry| entry.into_record(LocationKind::Municipality, Some(province.id)))
            .collect())
    }

    /// Fetches the barangays of a municipality
    /// (`GET /barangays?municipality={id}`).
    ///
    /// # Errors
    ///
    /// Returns any [`ClientError`] from the request or body decoding.
    pub async fn list_barangays(
        &self,
        municipality: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError> {
        let id = municipality.id.to_string();
        let url = self.endpoint(&["barangays"], [("municipality", id.as_str())]);
        let context = format!("barangays(municipality={id})");
        let body: ListResponse<DirectoryEntry> = self.get_json(url, &context).await?;
        Ok(body
            .into_vec()
            .into_iter()
            .map(|entry| entry.into_record(LocationKind::Barangay, Some(municipality.id)))
            .collect())
    }
}
