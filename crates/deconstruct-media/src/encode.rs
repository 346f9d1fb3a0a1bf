//! Transport encoding for inline media payloads.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{MediaError, MediaResult};
use crate::upload::UploadedFile;

/// Base64 media payload ready to be embedded in a JSON request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMedia {
    /// Standard base64 of the file content, without a data-URL prefix
    pub data: String,
    pub mime_type: String,
}

/// Encode an uploaded file for inline transport.
///
/// An empty file has no readable media and is rejected.
pub fn encode_media(file: &UploadedFile) -> MediaResult<EncodedMedia> {
    if file.bytes.is_empty() {
        return Err(MediaError::encoding(format!("{} is empty", file.name)));
    }

    if file.mime_type.trim().is_empty() {
        return Err(MediaError::encoding(format!(
            "{} has no declared type",
            file.name
        )));
    }

    Ok(EncodedMedia {
        data: STANDARD.encode(&file.bytes),
        mime_type: file.mime_type.clone(),
    })
}
