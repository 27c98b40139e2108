//! HTTP client for the directory/listing service.
//!
//! Wraps `reqwest` with base-URL handling, optional bearer auth, status
//! mapping to [`ClientError`], and retry on transient failures for reads.

mod directory;
mod listings;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;

/// Empty query for endpoints that take none.
pub(crate) const NO_QUERY: [(&str, &str); 0] = [];

/// Client for the directory/listing service.
///
/// Use [`BoardClient::from_config`] in the binary, or
/// [`BoardClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct BoardClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl BoardClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if the configured URL is invalid.
    pub fn from_config(config: &lokal_core::AppConfig) -> Result<Self, ClientError> {
        let mut client = Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms);
        client.token.clone_from(&config.api_token);
        Ok(client)
    }

    /// Creates a client with no retries and no auth token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse or cannot carry path segments.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joined segments land under the API
        // root instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Sets the retry policy applied to GET requests.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds an endpoint URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded individually, so a slug can never
    /// escape its path position.
    pub(crate) fn endpoint<I, K, V>(&self, segments: &[&str], query: I) -> Url
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        let pairs: Vec<(K, V)> = query.into_iter().collect();
        if !pairs.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in &pairs {
                qp.append_pair(k.as_ref(), v.as_ref());
            }
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a GET with retry, maps error statuses, and decodes the body.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] on 404 (not retried).
    /// - [`ClientError::RateLimited`] on 429 after retries are exhausted.
    /// - [`ClientError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.authorize(self.client.get(url.clone())).send().await?;
                let response = check_status(response)?;
                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

/// Maps 404/429/other non-2xx statuses onto typed errors.
fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    let url = response.url().to_string();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited { retry_after_secs });
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { url });
    }
    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }
    Ok(response)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
