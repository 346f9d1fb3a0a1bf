//! User-provided video files and the upload gate in front of the analyzer.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::{MediaError, MediaResult, ValidationError};

/// Size cap for client-side processing, in megabytes.
pub const DEFAULT_MAX_VIDEO_SIZE_MB: u64 = 20;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// An in-memory video file with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).await.map_err(|source| MediaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = guess_mime_type(path).to_string();

        debug!(
            file = %name,
            mime_type = %mime_type,
            size = bytes.len(),
            "Read video file"
        );

        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Declared type for a path, the way a browser file picker reports it.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "3gp" => "video/3gpp",
        "mpeg" | "mpg" => "video/mpeg",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Gate that rejects files the analyzer must never see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_mb: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_mb: DEFAULT_MAX_VIDEO_SIZE_MB,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_mb: u64) -> Self {
        Self { max_mb }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Accept only `video/*` files no larger than the cap.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        if !file.mime_type.starts_with("video/") {
            return Err(ValidationError::NotAVideo {
                mime_type: file.mime_type.clone(),
            });
        }

        if file.size() > self.max_bytes() {
            return Err(ValidationError::TooLarge {
                size: file.size(),
                max_mb: self.max_mb,
            });
        }

        Ok(())
    }
}
