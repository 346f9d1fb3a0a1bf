//! Publishing platforms and the spoken languages the analyzer recognizes.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Platform the analyzed video is intended for.
///
/// The platform only changes the wording of the analysis prompt: optimization
/// suggestions are tailored to its recommendation algorithm and audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum Platform {
    #[default]
    TikTok,
    Instagram,
    YouTube,
}

impl Platform {
    /// Returns the display name used in prompts and the platform selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TikTok => "TikTok",
            Self::Instagram => "Instagram",
            Self::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiktok" => Ok(Self::TikTok),
            "instagram" | "ig" => Ok(Self::Instagram),
            "youtube" | "yt" => Ok(Self::YouTube),
            _ => Err(ModelError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Spoken languages the analysis prompt restricts `detectedLanguage` to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SupportedLanguage {
    Portuguese,
    English,
    Spanish,
    Russian,
    Japanese,
    Malay,
    Thai,
    Indonesian,
}

impl SupportedLanguage {
    /// The fixed detection set, in prompt order.
    pub const ALL: [SupportedLanguage; 8] = [
        Self::Portuguese,
        Self::English,
        Self::Spanish,
        Self::Russian,
        Self::Japanese,
        Self::Malay,
        Self::Thai,
        Self::Indonesian,
    ];

    /// Order of the target-language options in the brief editor, after the
    /// detected language.
    pub const EDITOR_ORDER: [SupportedLanguage; 8] = [
        Self::English,
        Self::Spanish,
        Self::Portuguese,
        Self::Russian,
        Self::Japanese,
        Self::Indonesian,
        Self::Thai,
        Self::Malay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portuguese => "Portuguese",
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::Russian => "Russian",
            Self::Japanese => "Japanese",
            Self::Malay => "Malay",
            Self::Thai => "Thai",
            Self::Indonesian => "Indonesian",
        }
    }

    /// Lenient lookup of a model-reported language name.
    ///
    /// Accepts regional suffixes such as "Portuguese (Brazil)".
    pub fn from_name(name: &str) -> Option<Self> {
        let base = name.split('(').next().unwrap_or(name).trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(base))
    }

    /// Comma-separated list used inside prompts.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(|lang| lang.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
