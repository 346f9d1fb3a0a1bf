//! Error types for media intake.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while reading or encoding media.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media could not be encoded: {0}")]
    Encoding(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

/// Rejection of a user-provided file before any analysis starts.
///
/// Display strings are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("请上传有效的视频文件。")]
    NotAVideo { mime_type: String },

    #[error("文件大小超过 {max_mb}MB 限制。")]
    TooLarge { size: u64, max_mb: u64 },
}
