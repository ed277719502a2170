//! Read-only access to stylesheets and images

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PreviewError;

/// Source of raw stylesheet text and image bytes
pub trait AssetStore: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, PreviewError>;

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, PreviewError>;
}

/// Asset store backed by a directory.
///
/// Relative paths resolve against the root; absolute paths are used as-is.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl AssetStore for FsAssetStore {
    fn read_to_string(&self, path: &Path) -> Result<String, PreviewError> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|source| PreviewError::AssetRead { path: full, source })
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, PreviewError> {
        let full = self.resolve(path);
        fs::read(&full).map_err(|source| PreviewError::AssetRead { path: full, source })
    }
}

/// Encode image bytes as a `data:` URI
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        detect_image_mime(bytes),
        STANDARD.encode(bytes)
    )
}

/// Detect MIME type from image bytes (basic magic byte detection).
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG") {
        "image/png"
    } else if bytes.starts_with(b"\xFF\xD8\xFF") {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(&b"WEBP"[..]) {
        "image/webp"
    } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}
