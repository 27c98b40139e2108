//! Location identity for the classifieds board: a versioned, time-bounded
//! cache of the province/municipality/barangay directory, and a resolver
//! that turns URL slugs into canonical records.

pub mod cache;
pub mod error;
pub mod last_location;
pub mod resolved;
pub mod resolver;
pub mod session;
pub mod source;
pub mod store;

pub use cache::{
    DirectoryCache, DirectoryCacheEntry, DIRECTORY_SCHEMA_VERSION, DIRECTORY_TTL_HOURS,
    MAX_CLOCK_SKEW_MINUTES,
};
pub use error::CacheError;
pub use last_location::{LastLocation, LastLocationStore};
pub use resolved::{Resolution, ResolvedLocation};
pub use resolver::{LocationResolver, ResolutionKey};
pub use session::{PageSession, ResolutionState, TeardownHandle};
pub use source::DirectorySource;
pub use store::{CacheStore, FileStore, MemoryStore};
