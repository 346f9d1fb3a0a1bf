//! Analysis result data models.
//!
//! The analysis result is produced by an external model that is asked, but
//! not forced, to follow a response schema. Parsing is therefore strict:
//! every required field must be present and typed correctly, or the whole
//! payload is rejected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::brief::VideoBrief;
use crate::error::{ModelError, ModelResult};

/// Rewritten version of the spoken script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedScript {
    /// Rewritten script, in the same language as the source video
    pub original: String,
    /// Chinese translation of the rewritten script
    pub cn: String,
}

/// Chinese breakdown of the video's narrative structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoStructure {
    /// First three seconds
    pub hook: String,
    pub body: String,
    /// Ending and call to action
    pub cta: String,
    pub pacing: String,
}

/// Full result of one video analysis. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Main spoken language of the video
    pub detected_language: String,
    /// Verbatim transcription
    pub original_script: String,
    /// Simplified Chinese translation of the transcription
    pub chinese_script: String,
    pub optimized_script: OptimizedScript,
    pub structure: VideoStructure,
    pub highlights: Vec<String>,
    pub optimization_suggestions: Vec<String>,
    /// Seed for the brief editor
    pub initial_brief: VideoBrief,
}

/// Which script pair to copy from the result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptView {
    #[default]
    Transcript,
    Optimized,
}

impl AnalysisResult {
    /// Parse and validate the raw text returned by the model.
    ///
    /// Tolerates a surrounding markdown code fence; anything else that does
    /// not match the expected shape is an error.
    pub fn from_model_text(text: &str) -> ModelResult<Self> {
        let json = strip_code_fence(text);
        if json.is_empty() {
            return Err(ModelError::Empty);
        }

        let result: AnalysisResult = serde_json::from_str(json)?;
        result.validate()
    }

    /// Reject structurally valid payloads that are still unusable and
    /// normalize the brief's target language.
    pub fn validate(mut self) -> ModelResult<Self> {
        if self.detected_language.trim().is_empty() {
            return Err(ModelError::MissingField("detectedLanguage"));
        }

        self.initial_brief = self
            .initial_brief
            .with_fallback_language(&self.detected_language);
        Ok(self)
    }

    /// Plain-text rendering of a script pair for the clipboard.
    pub fn clipboard_text(&self, view: ScriptView) -> String {
        match view {
            ScriptView::Transcript => format!(
                "原文 ({}):\n{}\n\n中文翻译:\n{}",
                self.detected_language, self.original_script, self.chinese_script
            ),
            ScriptView::Optimized => format!(
                "优化后原文 ({}):\n{}\n\n优化后中文:\n{}",
                self.detected_language,
                non_empty_or_na(&self.optimized_script.original),
                non_empty_or_na(&self.optimized_script.cn)
            ),
        }
    }
}

fn non_empty_or_na(text: &str) -> &str {
    if text.is_empty() {
        "N/A"
    } else {
        text
    }
}

/// Strip an optional ```json ... ``` fence around a model payload.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "detectedLanguage": "Spanish",
            "originalScript": "Hola a todos",
            "chineseScript": "大家好",
            "optimizedScript": { "original": "¡Hola!", "cn": "你好！" },
            "structure": {
                "hook": "开头提问",
                "body": "产品演示",
                "cta": "引导关注",
                "pacing": "快节奏"
            },
            "highlights": ["反转"],
            "optimizationSuggestions": ["缩短开头"],
            "initialBrief": {
                "shootingGuide": { "cn": "近景", "target": "Close-up" },
                "scriptReference": { "cn": "大家好", "target": "Hola a todos" },
                "sellingPoints": { "cn": "便宜", "target": "Barato" },
                "targetLanguage": "Spanish"
            }
        })
    }

    #[test]
    fn test_parse_valid_payload() {
        let result = AnalysisResult::from_model_text(&payload().to_string()).unwrap();
        assert_eq!(result.detected_language, "Spanish");
        assert_eq!(result.structure.cta, "引导关注");
        assert_eq!(result.highlights, vec!["反转".to_string()]);
        assert_eq!(result.initial_brief.selling_points.target, "Barato");
    }

    #[test]
    fn test_parse_fenced_payload() {
        let text = format!("```json\n{}\n```", payload());
        assert!(AnalysisResult::from_model_text(&text).is_ok());
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(matches!(
            AnalysisResult::from_model_text("  "),
            Err(ModelError::Empty)
        ));
        assert!(matches!(
            AnalysisResult::from_model_text("```json\n```"),
            Err(ModelError::Empty)
        ));
    }

    #[test]
    fn test_missing_nested_field_is_rejected() {
        let mut value = payload();
        value["structure"].as_object_mut().unwrap().remove("pacing");
        assert!(matches!(
            AnalysisResult::from_model_text(&value.to_string()),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn test_null_string_is_rejected() {
        let mut value = payload();
        value["chineseScript"] = serde_json::Value::Null;
        assert!(AnalysisResult::from_model_text(&value.to_string()).is_err());
    }

    #[test]
    fn test_wrongly_typed_list_is_rejected() {
        let mut value = payload();
        value["highlights"] = json!("just one string");
        assert!(AnalysisResult::from_model_text(&value.to_string()).is_err());
    }

    #[test]
    fn test_blank_language_is_rejected() {
        let mut value = payload();
        value["detectedLanguage"] = json!(" ");
        assert!(matches!(
            AnalysisResult::from_model_text(&value.to_string()),
            Err(ModelError::MissingField("detectedLanguage"))
        ));
    }

    #[test]
    fn test_blank_brief_language_falls_back_to_detected() {
        let mut value = payload();
        value["initialBrief"]["targetLanguage"] = json!("");
        let result = AnalysisResult::from_model_text(&value.to_string()).unwrap();
        assert_eq!(result.initial_brief.target_language, "Spanish");
    }

    #[test]
    fn test_clipboard_text() {
        let mut result = AnalysisResult::from_model_text(&payload().to_string()).unwrap();
        assert_eq!(
            result.clipboard_text(ScriptView::Transcript),
            "原文 (Spanish):\nHola a todos\n\n中文翻译:\n大家好"
        );

        result.optimized_script.cn.clear();
        assert_eq!(
            result.clipboard_text(ScriptView::Optimized),
            "优化后原文 (Spanish):\n¡Hola!\n\n优化后中文:\nN/A"
        );
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence(" {} "), "{}");
    }
}
