//! Gemini REST transport.
//!
//! Speaks the `generateContent` endpoint of the Generative Language API.
//! Callers build a [`GenerateRequest`] (inline media, prompt text and an
//! optional response schema) and get back the concatenated text of the first
//! candidate, or `None` when the model produced no text.

use std::time::Duration;

use async_trait::async_trait;
use deconstruct_media::EncodedMedia;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AiError, AiResult};

/// Default model for both analysis and translation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default bound on a single call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that can answer a generate request.
///
/// The analysis and translation clients only depend on this seam, so they can
/// run against a mock or any other backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Issue one call. `Ok(None)` means the model answered without text.
    async fn generate(&self, request: GenerateRequest) -> AiResult<Option<String>>;
}

/// One piece of request content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    InlineMedia(EncodedMedia),
}

/// Provider-neutral request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub parts: Vec<RequestPart>,
    /// When set, the model is asked for `application/json` matching it
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inline_media(mut self, media: EncodedMedia) -> Self {
        self.parts.push(RequestPart::InlineMedia(media));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(RequestPart::Text(text.into()));
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// First text part, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            RequestPart::Text(text) => Some(text.as_str()),
            RequestPart::InlineMedia(_) => None,
        })
    }

    /// First inline media part, if any.
    pub fn media(&self) -> Option<&EncodedMedia> {
        self.parts.iter().find_map(|part| match part {
            RequestPart::InlineMedia(media) => Some(media),
            RequestPart::Text(_) => None,
        })
    }
}

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> AiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::config("Gemini API key is empty"));
        }

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| AiError::config(format!("Invalid base URL: {}", e)))?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gemini API client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireResponseContent>,
}

#[derive(Debug, Deserialize)]
struct WireResponseContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}

impl<'a> From<&'a GenerateRequest> for WireRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => WirePart {
                    text: Some(text.as_str()),
                    inline_data: None,
                },
                RequestPart::InlineMedia(media) => WirePart {
                    text: None,
                    inline_data: Some(WireInlineData {
                        mime_type: &media.mime_type,
                        data: &media.data,
                    }),
                },
            })
            .collect();

        WireRequest {
            contents: vec![WireContent { parts }],
            generation_config: request.response_schema.as_ref().map(|schema| {
                WireGenerationConfig {
                    response_mime_type: "application/json",
                    response_schema: schema,
                }
            }),
        }
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> AiResult<Url> {
        self.config
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.config.model))
            .map_err(|e| AiError::config(format!("Invalid Gemini endpoint: {}", e)))
    }

    /// The request URL is stripped so error text never carries request details.
    fn map_send_error(&self, err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout(self.config.timeout)
        } else {
            AiError::transport(format!("Gemini API request failed: {}", err.without_url()))
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> AiResult<Option<String>> {
        let url = self.endpoint()?;
        let body = WireRequest::from(&request);

        info!(
            model = %self.config.model,
            parts = request.parts.len(),
            structured = request.response_schema.is_some(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<WireErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            warn!(status = %status, "Gemini API call failed");
            return Err(AiError::transport(format!(
                "Gemini API returned {}: {}",
                status, message
            )));
        }

        let parsed: WireResponse = serde_json::from_str(&text)
            .map_err(|e| AiError::parse(format!("Failed to parse Gemini response: {}", e)))?;

        let output: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        debug!(chars = output.chars().count(), "Gemini response received");

        if output.is_empty() {
            Ok(None)
        } else {
            Ok(Some(output))
        }
    }
}
