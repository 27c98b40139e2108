pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod submission;
pub mod types;

pub use client::BoardClient;
pub use error::ClientError;
pub use submission::{CreatedListing, ListingForm};
pub use types::{AnnouncementSummary, DirectoryEntry, ListResponse, ListingSummary, Page};
