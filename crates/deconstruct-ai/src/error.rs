//! AI client error types.

use std::time::Duration;

use deconstruct_media::MediaError;
use deconstruct_models::ModelError;
use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] MediaError),

    /// The call itself failed. The upstream message is kept verbatim.
    #[error("{0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AiError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a manual retry by the user could plausibly succeed.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AiError::Transport(_) | AiError::Timeout(_))
    }
}

impl From<ModelError> for AiError {
    fn from(err: ModelError) -> Self {
        AiError::Parse(err.to_string())
    }
}
