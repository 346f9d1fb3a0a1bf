//! Shared data models for the video deconstruction workflow.
//!
//! This crate provides Serde-serializable types for:
//! - Target platforms and supported spoken languages
//! - The structured analysis result returned by the AI model
//! - The editable bilingual replication brief and its export view
//! - The three-step application flow

pub mod analysis;
pub mod brief;
pub mod error;
pub mod platform;
pub mod step;

// Re-export common types
pub use analysis::{AnalysisResult, OptimizedScript, ScriptView, VideoStructure};
pub use brief::{BriefField, DualLanguageField, ExportSnapshot, VideoBrief};
pub use error::{ModelError, ModelResult};
pub use platform::{Platform, SupportedLanguage};
pub use step::AppStep;
