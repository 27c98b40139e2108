use thiserror::Error;

/// Failures of the persisted directory cache.
///
/// Readers treat every variant as a cache miss; none of them is fatal to
/// location resolution.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache entry {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache entry {key} is {bytes} bytes, above the {limit}-byte limit")]
    Oversized { key: String, bytes: usize, limit: usize },
}
