//! Application configuration.

use std::time::Duration;

use deconstruct_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use deconstruct_ai::{AiError, AiResult, GeminiConfig};
use deconstruct_media::{UploadPolicy, DEFAULT_MAX_VIDEO_SIZE_MB};
use tracing::warn;
use url::Url;

/// Idle time after the last Chinese edit before a field is re-translated.
pub const DEFAULT_SYNC_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key (`GEMINI_API_KEY`, or `API_KEY`)
    pub api_key: Option<String>,
    /// Model used for analysis and translation
    pub model: String,
    /// Generative Language API host
    pub base_url: Url,
    /// Upload size cap in megabytes
    pub max_video_size_mb: u64,
    /// Auto-sync debounce interval
    pub sync_debounce: Duration,
    /// Bound on every external call
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: default_base_url(),
            max_video_size_mb: DEFAULT_MAX_VIDEO_SIZE_MB,
            sync_debounce: DEFAULT_SYNC_DEBOUNCE,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());

        let base_url = match lookup("GEMINI_BASE_URL") {
            Some(raw) => Url::parse(&raw).unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Ignoring invalid GEMINI_BASE_URL");
                default_base_url()
            }),
            None => default_base_url(),
        };

        Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url,
            max_video_size_mb: lookup("MAX_VIDEO_SIZE_MB")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_MB),
            sync_debounce: lookup("SYNC_DEBOUNCE_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SYNC_DEBOUNCE),
            request_timeout: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(self.max_video_size_mb)
    }

    /// Gemini connection settings. Fails when no API key is configured.
    pub fn gemini_config(&self) -> AiResult<GeminiConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| AiError::config("GEMINI_API_KEY not set"))?;

        Ok(GeminiConfig::new(api_key)?
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.request_timeout))
    }
}
