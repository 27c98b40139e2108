use thiserror::Error;

use crate::media::ImageSource;

/// Rejected media staging operations. State is unchanged when one of these
/// is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StagingError {
    #[error("cannot stage more than {max} images ({current} already staged)")]
    CapacityExceeded { current: usize, max: usize },

    #[error("no {origin} image at index {index} ({len} staged)")]
    IndexOutOfRange {
        origin: ImageSource,
        index: usize,
        len: usize,
    },

    #[error("asset {asset_id} is already staged")]
    DuplicateAsset { asset_id: i64 },

    #[error("no staged image for preview ticket {0}")]
    UnknownTicket(u64),
}
