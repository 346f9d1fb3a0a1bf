//! Application flow steps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Step of the upload -> analyze -> result flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppStep {
    /// Waiting for a video file
    #[default]
    Upload,
    /// The analysis call is in flight
    Analyzing,
    /// Analysis succeeded; result and brief editor are shown
    Result,
}

impl AppStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Analyzing => "analyzing",
            Self::Result => "result",
        }
    }

    /// Label shown in the navigation breadcrumb.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upload => "上传视频",
            Self::Analyzing => "AI 分析",
            Self::Result => "拆解结果",
        }
    }
}

impl std::fmt::Display for AppStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
