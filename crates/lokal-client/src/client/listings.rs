//! Listing and announcement retrieval, and listing submission.

use reqwest::multipart::{Form, Part};

use lokal_core::LocalFile;

use super::{check_status, BoardClient};
use crate::error::ClientError;
use crate::submission::{parse_rejection, CreatedListing, ListingForm};
use crate::types::{AnnouncementSummary, ListResponse, ListingSummary, Page};

impl BoardClient {
    /// Fetches listings matching `params` (`GET /listings`).
    ///
    /// Accepts either a paginated or a bare-array body.
    ///
    /// # Errors
    ///
    /// Returns any [`ClientError`] from the request or body decoding.
    pub async fn list_listings<I, K, V>(&self, params: I) -> Result<Page<ListingSummary>, ClientError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoint(&["listings"], params);
        let context = format!("listings({})", url.query().unwrap_or_default());
        let body: ListResponse<ListingSummary> = self.get_json(url, &context).await?;
        Ok(Page::from(body))
    }

    /// Fetches announcements matching `params` (`GET /announcements`).
    ///
    /// # Errors
    ///
    /// Returns any [`ClientError`] from the request or body decoding.
    pub async fn list_announcements<I, K, V>(
        &self,
        params: I,
    ) -> Result<Page<AnnouncementSummary>, ClientError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoint(&["announcements"], params);
        let context = format!("announcements({})", url.query().unwrap_or_default());
        let body: ListResponse<AnnouncementSummary> = self.get_json(url, &context).await?;
        Ok(Page::from(body))
    }

    /// Creates a listing (`POST /listings`) as a multipart body.
    ///
    /// Text fields come from `form`; each reused asset id is sent as a
    /// repeated `reused_image_ids` part and each new file as a repeated
    /// `uploaded_images` file part. Submissions are never retried.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Io`] if an upload file cannot be read.
    /// - [`ClientError::SubmissionRejected`] on HTTP 400, with the service's
    ///   field messages.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::Http`] otherwise.
    pub async fn create_listing(
        &self,
        form: &ListingForm,
        reused_image_ids: &[i64],
        new_files: &[LocalFile],
    ) -> Result<CreatedListing, ClientError> {
        let mut body = Form::new();
        for (name, value) in form.fields() {
            body = body.text(name, value);
        }
        for id in reused_image_ids {
            body = body.text("reused_image_ids", id.to_string());
        }
        for file in new_files {
            let bytes = tokio::fs::read(file.path())
                .await
                .map_err(|source| ClientError::Io {
                    path: file.path.clone(),
                    source,
                })?;
            let part = Part::bytes(bytes)
                .file_name(file.file_name.clone())
                .mime_str(file.content_type())?;
            body = body.part("uploaded_images", part);
        }

        let url = self.endpoint(&["listings"], super::NO_QUERY);
        tracing::info!(
            title = %form.title,
            reused = reused_image_ids.len(),
            uploads = new_files.len(),
            "submitting listing"
        );
        let response = self
            .authorize(self.client.post(url))
            .multipart(body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            let text = response.text().await?;
            let fields = parse_rejection(&text);
            tracing::warn!(fields = fields.len(), "listing submission rejected");
            return Err(ClientError::SubmissionRejected { fields });
        }

        let response = check_status(response)?;
        let text = response.text().await?;
        serde_json::from_str::<CreatedListing>(&text).map_err(|e| ClientError::Deserialize {
            context: "create_listing".to_owned(),
            source: e,
        })
    }
}
