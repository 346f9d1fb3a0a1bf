//! Gemini-backed AI clients.
//!
//! This crate provides:
//! - Prompt and response-schema builders for video analysis
//! - The Gemini `generateContent` transport
//! - An analysis client producing strictly validated results
//! - A free-text translation client for brief sections

pub mod analysis;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod translate;

pub use analysis::{AnalysisClient, AnalysisRequest, VideoAnalyzer};
pub use error::{AiError, AiResult};
pub use gemini::{GeminiClient, GeminiConfig, GenerateRequest, GenerativeModel, RequestPart};
pub use prompt::{build_analysis_prompt, build_translation_prompt, AnalysisPrompt};
pub use translate::{TranslationClient, Translator};
