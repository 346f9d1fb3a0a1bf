//! Model error types.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Response is empty")]
    Empty,

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing or blank field: {0}")]
    MissingField(&'static str),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Unknown brief field: {0}")]
    UnknownField(String),
}
