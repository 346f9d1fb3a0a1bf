//! Video file intake for the analysis pipeline.
//!
//! This crate provides:
//! - Upload validation (declared type and size cap)
//! - Reading video files from disk
//! - Encoding media into a transport-safe payload

pub mod encode;
pub mod error;
pub mod upload;

pub use encode::{encode_media, EncodedMedia};
pub use error::{MediaError, MediaResult, ValidationError};
pub use upload::{UploadPolicy, UploadedFile, DEFAULT_MAX_VIDEO_SIZE_MB};
