use std::path::{Path, PathBuf};

/// A file chosen on the local machine and pending upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl LocalFile {
    /// Wraps a path, taking the file name from its last component.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Self { path, file_name }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Guesses the image MIME type from the file extension.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "heic" => "image/heic",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_takes_last_component() {
        let f = LocalFile::from_path("/tmp/photos/house-front.JPG");
        assert_eq!(f.file_name, "house-front.JPG");
        assert_eq!(f.content_type(), "image/jpeg");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(LocalFile::from_path("notes.txt").content_type(), "application/octet-stream");
        assert_eq!(LocalFile::from_path("noext").content_type(), "application/octet-stream");
    }
}
