use async_trait::async_trait;

use lokal_client::{BoardClient, ClientError};
use lokal_core::LocationRecord;

/// Where the resolver fetches directory lists from on a cache miss.
///
/// Implemented by [`BoardClient`]; tests substitute counting fakes.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn provinces(&self) -> Result<Vec<LocationRecord>, ClientError>;

    async fn municipalities(
        &self,
        province: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError>;

    async fn barangays(
        &self,
        municipality: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError>;
}

#[async_trait]
impl DirectorySource for BoardClient {
    async fn provinces(&self) -> Result<Vec<LocationRecord>, ClientError> {
        self.list_provinces().await
    }

    async fn municipalities(
        &self,
        province: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError> {
        self.list_municipalities(province).await
    }

    async fn barangays(
        &self,
        municipality: &LocationRecord,
    ) -> Result<Vec<LocationRecord>, ClientError> {
        self.list_barangays(municipality).await
    }
}
