//! Persistence backends for the directory cache.
//!
//! - [`MemoryStore`]: process-local map, used in tests and short-lived runs.
//! - [`FileStore`]: one JSON file per key under a cache directory.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::CacheError;

/// Key/value storage behind [`crate::DirectoryCache`].
///
/// Implementations must replace a key's payload atomically: a concurrent
/// `load` sees either the old payload or the new one, never a mix.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the payload stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `payload` under `key`, replacing any previous payload.
    async fn save(&self, key: &str, payload: &str) -> Result<(), CacheError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every key starting with `prefix`.
    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}
