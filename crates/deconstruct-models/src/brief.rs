//! Replication brief models.
//!
//! A brief is the three-section guide handed to a foreign creator who
//! re-shoots the analyzed video. Every section carries a Chinese side for the
//! operator and a target-language side for the creator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Text carried in both the operator language and the audience language.
///
/// The two sides are edited independently. `target` is only a best-effort
/// translation of `cn`, refreshed by explicit sync operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DualLanguageField {
    /// Chinese content, operator facing
    pub cn: String,
    /// Target-language content, creator facing
    pub target: String,
}

impl DualLanguageField {
    pub fn new(cn: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            cn: cn.into(),
            target: target.into(),
        }
    }
}

/// Key of one of the three brief sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BriefField {
    ShootingGuide,
    ScriptReference,
    SellingPoints,
}

impl BriefField {
    pub const ALL: [BriefField; 3] = [
        BriefField::ShootingGuide,
        BriefField::ScriptReference,
        BriefField::SellingPoints,
    ];

    /// Wire key; also the field context sent with translation requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShootingGuide => "shootingGuide",
            Self::ScriptReference => "scriptReference",
            Self::SellingPoints => "sellingPoints",
        }
    }
}

impl fmt::Display for BriefField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BriefField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// The editable replication brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoBrief {
    /// Shots, camera work, scene setup and performance
    pub shooting_guide: DualLanguageField,
    /// Spoken lines or text overlays, line by line
    pub script_reference: DualLanguageField,
    /// Product selling points, one per line
    pub selling_points: DualLanguageField,
    /// Language of the `target` side (English name)
    pub target_language: String,
}

impl VideoBrief {
    /// Brief shown while the real one is still loading.
    pub fn placeholder() -> Self {
        let loading = || DualLanguageField::new("加载中...", "Loading...");
        Self {
            shooting_guide: loading(),
            script_reference: loading(),
            selling_points: loading(),
            target_language: "English".to_string(),
        }
    }

    pub fn field(&self, field: BriefField) -> &DualLanguageField {
        match field {
            BriefField::ShootingGuide => &self.shooting_guide,
            BriefField::ScriptReference => &self.script_reference,
            BriefField::SellingPoints => &self.selling_points,
        }
    }

    pub fn field_mut(&mut self, field: BriefField) -> &mut DualLanguageField {
        match field {
            BriefField::ShootingGuide => &mut self.shooting_guide,
            BriefField::ScriptReference => &mut self.script_reference,
            BriefField::SellingPoints => &mut self.selling_points,
        }
    }

    /// Fill a blank target language with `fallback`.
    pub fn with_fallback_language(mut self, fallback: &str) -> Self {
        if self.target_language.trim().is_empty() {
            self.target_language = fallback.to_string();
        }
        self
    }
}

/// Read-only, render-ready view of a brief for export.
///
/// Contains only the target-language side of each section. The Chinese
/// operator text never leaves the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub target_language: String,
    /// Detected language of the source video ("Source Ref")
    pub source_language: String,
    pub shooting_guide: String,
    pub script_reference: String,
    pub selling_points: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportSnapshot {
    pub fn from_brief(brief: &VideoBrief, source_language: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            target_language: brief.target_language.clone(),
            source_language: source_language.to_string(),
            shooting_guide: brief.shooting_guide.target.clone(),
            script_reference: brief.script_reference.target.clone(),
            selling_points: brief.selling_points.target.clone(),
            generated_at,
        }
    }

    /// File name for the rendered image, e.g. `Brief_English_2025-01-31.png`.
    pub fn file_name(&self) -> String {
        format!(
            "Brief_{}_{}.png",
            self.target_language,
            self.generated_at.format("%Y-%m-%d")
        )
    }
}
