//! Application error types.

use deconstruct_ai::AiError;
use deconstruct_media::ValidationError;
use deconstruct_models::AppStep;
use thiserror::Error;

/// Errors from the upload/analyze/result flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("An analysis is already running or finished (step: {0})")]
    Busy(AppStep),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("分析失败: {0}")]
    Analysis(#[from] AiError),
}

impl FlowError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Errors from brief editing.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Translation failed: {0}")]
    Translation(#[from] AiError),
}

pub type FlowResult<T> = Result<T, FlowError>;
pub type SessionResult<T> = Result<T, SessionError>;
