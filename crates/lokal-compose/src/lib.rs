//! Composition of what the board sends to the service: listing and
//! announcement query parameters derived from a resolved location, and the
//! image set of a new listing.

pub mod error;
pub mod media;
pub mod query;
pub mod submission;

pub use error::StagingError;
pub use media::{
    generate_preview, ExistingAsset, ImageSource, MediaStaging, Preview, PreviewTicket,
    StagedImage, SubmissionPayload, MAX_STAGED_IMAGES,
};
pub use query::{
    build_announcement_query, build_listing_query, AnnouncementFilters, FilterState, QueryParams,
};
pub use submission::apply_location;
