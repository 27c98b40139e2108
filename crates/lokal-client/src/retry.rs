//! Retry with exponential back-off and jitter for idempotent service reads.
//!
//! Only GET requests go through [`retry_with_backoff`]. Listing submission is
//! never retried, since a timed-out POST may already have created the listing.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** network timeouts and connection failures, HTTP 429, and
/// HTTP 5xx.
///
/// **Not retriable:** 404, other 4xx, malformed bodies, submission
/// rejections, local I/O and configuration errors.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::RateLimited { .. } => true,
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Deserialize { .. }
        | ClientError::NotFound { .. }
        | ClientError::InvalidBaseUrl { .. }
        | ClientError::SubmissionRejected { .. }
        | ClientError::Io { .. } => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Delay before retry number `attempt` (1-based).
///
/// `backoff_base_ms × 2^(attempt-1)` with ±25 % jitter, capped at 30 s. A
/// rate-limited response waits at least its `Retry-After`, within the same cap.
fn backoff_delay(err: &ClientError, attempt: u32, backoff_base_ms: u64) -> Duration {
    let exponential = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (exponential.min(MAX_DELAY_MS) as f64 * rand::random_range(0.75..1.25)) as u64;
    let floor = match err {
        ClientError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1_000),
        _ => 0,
    };
    Duration::from_millis(jittered.max(floor).min(MAX_DELAY_MS))
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
///
/// Non-retriable errors, and the last transient one, are returned as-is.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        attempt += 1;
        let delay = backoff_delay(&err, attempt, backoff_base_ms);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient service error, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}
