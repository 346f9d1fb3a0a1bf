//! Video analysis client.

use std::sync::Arc;

use async_trait::async_trait;
use deconstruct_media::{encode_media, UploadedFile};
use deconstruct_models::{AnalysisResult, Platform};
use tracing::{info, warn};

use crate::error::{AiError, AiResult};
use crate::gemini::{GenerateRequest, GenerativeModel};
use crate::prompt::{build_analysis_prompt, AnalysisPrompt};

/// One video to analyze. Consumed by the analyzer.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub media: UploadedFile,
    pub platform: Platform,
}

impl AnalysisRequest {
    pub fn new(media: UploadedFile, platform: Platform) -> Self {
        Self { media, platform }
    }
}

/// Turns a video into a typed analysis result.
#[async_trait]
pub trait VideoAnalyzer: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> AiResult<AnalysisResult>;
}

/// Analyzer backed by a generative model.
///
/// Performs exactly one model call per request and never retries. The
/// response is parsed strictly: an empty or mis-shaped payload is a
/// [`AiError::Parse`], never a partially filled result.
pub struct AnalysisClient {
    model: Arc<dyn GenerativeModel>,
}

impl AnalysisClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl VideoAnalyzer for AnalysisClient {
    async fn analyze(&self, request: AnalysisRequest) -> AiResult<AnalysisResult> {
        let AnalysisRequest { media, platform } = request;
        let AnalysisPrompt { prompt, schema } = build_analysis_prompt(platform);

        let encoded = encode_media(&media)?;
        info!(
            file = %media.name,
            mime_type = %encoded.mime_type,
            size = media.size(),
            platform = %platform,
            "Submitting video for analysis"
        );
        drop(media);

        let call = GenerateRequest::new()
            .with_inline_media(encoded)
            .with_text(prompt)
            .with_response_schema(schema);

        let text = self
            .model
            .generate(call)
            .await?
            .ok_or_else(|| AiError::parse("Gemini API returned no data"))?;

        let result = AnalysisResult::from_model_text(&text).map_err(|e| {
            warn!(error = %e, "Analysis response did not match the expected shape");
            AiError::from(e)
        })?;

        info!(
            language = %result.detected_language,
            highlights = result.highlights.len(),
            suggestions = result.optimization_suggestions.len(),
            "Analysis completed"
        );

        Ok(result)
    }
}
