//! Staging of a listing's images from two sources: assets the user already
//! uploaded, and new local files awaiting upload.
//!
//! Both sources live in one ordered list of [`StagedImage`] values, in
//! selection order. Removal is addressed by source-local index, so removing
//! from one source never shifts the indices of the other.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use lokal_core::LocalFile;

use crate::error::StagingError;

/// Upper bound on staged images across both sources.
pub const MAX_STAGED_IMAGES: usize = 10;

/// A previously uploaded image offered for reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAsset {
    pub id: i64,
    pub preview_url: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSource {
    Reused,
    New,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Reused => write!(f, "reused"),
            ImageSource::New => write!(f, "new"),
        }
    }
}

/// Identifies the new-file entry a preview belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewTicket(u64);

impl PreviewTicket {
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Preview of a new file. Purely cosmetic: an unavailable preview never
/// unstages the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Pending,
    /// A `data:` URL with the file's bytes.
    Ready(String),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedImage {
    Reused(ExistingAsset),
    New {
        file: LocalFile,
        preview: Preview,
        ticket: PreviewTicket,
    },
}

impl StagedImage {
    #[must_use]
    pub fn source(&self) -> ImageSource {
        match self {
            StagedImage::Reused(_) => ImageSource::Reused,
            StagedImage::New { .. } => ImageSource::New,
        }
    }
}

/// What the listing submission needs from the staged set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub reused_ids: Vec<i64>,
    pub new_files: Vec<LocalFile>,
}

/// The staged image set of one listing being composed.
///
/// Every mutation either applies fully or returns an error and leaves the
/// set untouched.
#[derive(Debug, Clone, Default)]
pub struct MediaStaging {
    items: Vec<StagedImage>,
    next_ticket: u64,
}

impl MediaStaging {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slots left before [`MAX_STAGED_IMAGES`].
    #[must_use]
    pub fn remaining(&self) -> usize {
        MAX_STAGED_IMAGES.saturating_sub(self.items.len())
    }

    /// All staged images in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &StagedImage> {
        self.items.iter()
    }

    pub fn reused(&self) -> impl Iterator<Item = &ExistingAsset> {
        self.items.iter().filter_map(|item| match item {
            StagedImage::Reused(asset) => Some(asset),
            StagedImage::New { .. } => None,
        })
    }

    pub fn new_files(&self) -> impl Iterator<Item = &LocalFile> {
        self.items.iter().filter_map(|item| match item {
            StagedImage::New { file, .. } => Some(file),
            StagedImage::Reused(_) => None,
        })
    }

    /// New files whose preview has not been generated yet.
    #[must_use]
    pub fn pending_previews(&self) -> Vec<(PreviewTicket, LocalFile)> {
        self.items
            .iter()
            .filter_map(|item| match item {
                StagedImage::New {
                    file,
                    preview: Preview::Pending,
                    ticket,
                } => Some((*ticket, file.clone())),
                _ => None,
            })
            .collect()
    }

    fn ensure_capacity(&self) -> Result<(), StagingError> {
        if self.items.len() >= MAX_STAGED_IMAGES {
            return Err(StagingError::CapacityExceeded {
                current: self.items.len(),
                max: MAX_STAGED_IMAGES,
            });
        }
        Ok(())
    }

    /// Stages a previously uploaded asset.
    ///
    /// # Errors
    ///
    /// - [`StagingError::CapacityExceeded`] when the set is full.
    /// - [`StagingError::DuplicateAsset`] when the asset is already staged.
    pub fn add_reused(&mut self, asset: ExistingAsset) -> Result<(), StagingError> {
        self.ensure_capacity()?;
        if self.reused().any(|staged| staged.id == asset.id) {
            return Err(StagingError::DuplicateAsset { asset_id: asset.id });
        }
        tracing::debug!(asset_id = asset.id, "staged reused image");
        self.items.push(StagedImage::Reused(asset));
        Ok(())
    }

    /// Stages a new local file with a pending preview.
    ///
    /// The returned ticket is later handed to
    /// [`MediaStaging::attach_preview`]; staging does not wait for it.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::CapacityExceeded`] when the set is full.
    pub fn add_new(&mut self, file: LocalFile) -> Result<PreviewTicket, StagingError> {
        self.ensure_capacity()?;
        let ticket = PreviewTicket(self.next_ticket);
        self.next_ticket += 1;
        tracing::debug!(file = %file.file_name, ticket = ticket.0, "staged new image");
        self.items.push(StagedImage::New {
            file,
            preview: Preview::Pending,
            ticket,
        });
        Ok(ticket)
    }

    /// Removes the `index`-th image of `source`, counting only that source.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::IndexOutOfRange`] if `source` has no such
    /// image.
    pub fn remove(&mut self, source: ImageSource, index: usize) -> Result<StagedImage, StagingError> {
        let positions: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.source() == source)
            .map(|(pos, _)| pos)
            .collect();
        let Some(&pos) = positions.get(index) else {
            return Err(StagingError::IndexOutOfRange {
                origin: source,
                index,
                len: positions.len(),
            });
        };
        Ok(self.items.remove(pos))
    }

    /// Applies the outcome of a preview generation.
    ///
    /// A failed generation marks the preview unavailable; the file stays
    /// staged.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::UnknownTicket`] if the file was removed in the
    /// meantime.
    pub fn attach_preview<E: std::fmt::Display>(
        &mut self,
        ticket: PreviewTicket,
        result: Result<String, E>,
    ) -> Result<(), StagingError> {
        let slot = self.items.iter_mut().find_map(|item| match item {
            StagedImage::New {
                preview,
                ticket: staged,
                ..
            } if *staged == ticket => Some(preview),
            _ => None,
        });
        let Some(slot) = slot else {
            return Err(StagingError::UnknownTicket(ticket.0));
        };
        *slot = match result {
            Ok(data_url) => Preview::Ready(data_url),
            Err(e) => {
                tracing::debug!(ticket = ticket.0, error = %e, "preview unavailable");
                Preview::Unavailable
            }
        };
        Ok(())
    }

    /// Splits the staged set into the two lists the submission expects,
    /// each in selection order.
    #[must_use]
    pub fn to_submission_payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            reused_ids: self.reused().map(|asset| asset.id).collect(),
            new_files: self.new_files().cloned().collect(),
        }
    }
}

/// Reads `file` and encodes it as a base64 `data:` URL.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub async fn generate_preview(file: &LocalFile) -> std::io::Result<String> {
    let bytes = tokio::fs::read(file.path()).await?;
    Ok(format!(
        "data:{};base64,{}",
        file.content_type(),
        STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
