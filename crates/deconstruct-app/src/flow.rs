//! Upload -> analyze -> result state machine.

use std::sync::Arc;
use std::time::Duration;

use deconstruct_ai::{AnalysisRequest, Translator, VideoAnalyzer};
use deconstruct_media::{UploadPolicy, UploadedFile};
use deconstruct_models::{AnalysisResult, AppStep, Platform};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DEFAULT_SYNC_DEBOUNCE;
use crate::error::{FlowError, FlowResult};
use crate::notify::Notifier;
use crate::session::BriefSession;

/// Cosmetic progress messages shown while the analysis call is in flight,
/// with their offset from the start of the call.
pub const PROGRESS_SCHEDULE: [(Duration, &str); 4] = [
    (Duration::from_secs(0), "正在上传视频到 Gemini..."),
    (Duration::from_secs(2), "正在转录音频并识别语言..."),
    (Duration::from_secs(5), "正在拆解视频结构并提取亮点..."),
    (Duration::from_secs(8), "正在生成本地化翻拍脚本..."),
];

/// Published flow status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowStatus {
    pub step: AppStep,
    /// Progress message, only set while analyzing
    pub message: Option<String>,
}

impl Default for FlowStatus {
    fn default() -> Self {
        Self {
            step: AppStep::Upload,
            message: None,
        }
    }
}

/// Metadata of the held video, kept for preview while analyzing and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaPreview {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl From<&UploadedFile> for MediaPreview {
    fn from(file: &UploadedFile) -> Self {
        Self {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size(),
        }
    }
}

/// Drives one video through upload, analysis and result.
///
/// Only one analysis can ever run: `select_file` takes `&mut self` and is
/// refused outside the upload step.
pub struct AnalysisFlow {
    step: AppStep,
    platform: Platform,
    policy: UploadPolicy,
    sync_debounce: Duration,
    analyzer: Arc<dyn VideoAnalyzer>,
    translator: Arc<dyn Translator>,
    notifier: Arc<dyn Notifier>,
    status: watch::Sender<FlowStatus>,
    analysis_id: Option<Uuid>,
    preview: Option<MediaPreview>,
    result: Option<AnalysisResult>,
    session: Option<BriefSession>,
}

impl AnalysisFlow {
    pub fn new(
        analyzer: Arc<dyn VideoAnalyzer>,
        translator: Arc<dyn Translator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (status, _) = watch::channel(FlowStatus::default());
        Self {
            step: AppStep::Upload,
            platform: Platform::default(),
            policy: UploadPolicy::default(),
            sync_debounce: DEFAULT_SYNC_DEBOUNCE,
            analyzer,
            translator,
            notifier,
            status,
            analysis_id: None,
            preview: None,
            result: None,
            session: None,
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sync_debounce(mut self, debounce: Duration) -> Self {
        self.sync_debounce = debounce;
        self
    }

    pub fn step(&self) -> AppStep {
        self.step
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Change the target platform. Ignored outside the upload step.
    pub fn set_platform(&mut self, platform: Platform) -> bool {
        if self.step != AppStep::Upload {
            warn!(step = %self.step, platform = %platform, "Platform change ignored");
            return false;
        }
        self.platform = platform;
        true
    }

    /// Watch step changes and progress messages.
    pub fn subscribe(&self) -> watch::Receiver<FlowStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> FlowStatus {
        self.status.borrow().clone()
    }

    pub fn analysis_id(&self) -> Option<Uuid> {
        self.analysis_id
    }

    pub fn preview(&self) -> Option<&MediaPreview> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Brief editing session, available once the analysis succeeded.
    pub fn session(&self) -> Option<&BriefSession> {
        self.session.as_ref()
    }

    /// Validate `file`, analyze it and move to the result step.
    ///
    /// Validation and analysis failures are reported through the notifier
    /// and leave the flow in the upload step.
    pub async fn select_file(&mut self, file: UploadedFile) -> FlowResult<()> {
        if self.step != AppStep::Upload {
            return Err(FlowError::Busy(self.step));
        }

        if let Err(e) = self.policy.validate(&file) {
            warn!(file = %file.name, mime_type = %file.mime_type, size = file.size(), error = %e, "Upload rejected");
            self.notifier.notify(&e.to_string());
            return Err(e.into());
        }

        let analysis_id = Uuid::new_v4();
        self.analysis_id = Some(analysis_id);
        self.preview = Some(MediaPreview::from(&file));
        self.set_step(AppStep::Analyzing);
        info!(
            analysis_id = %analysis_id,
            file = %file.name,
            size = file.size(),
            platform = %self.platform,
            "Analysis started"
        );

        let ticker = self.spawn_progress_ticker();
        let outcome = self
            .analyzer
            .analyze(AnalysisRequest::new(file, self.platform))
            .await;
        ticker.abort();

        match outcome {
            Ok(result) => {
                let session = BriefSession::new(
                    result.initial_brief.clone(),
                    result.detected_language.clone(),
                    Arc::clone(&self.translator),
                    Arc::clone(&self.notifier),
                    self.sync_debounce,
                );

                info!(
                    analysis_id = %analysis_id,
                    detected_language = %result.detected_language,
                    "Analysis finished"
                );
                self.result = Some(result);
                self.session = Some(session);
                self.set_step(AppStep::Result);
                Ok(())
            }
            Err(e) => {
                let err = FlowError::Analysis(e);
                warn!(analysis_id = %analysis_id, error = %err, "Analysis failed");
                self.notifier.notify(&err.user_message());
                self.preview = None;
                self.set_step(AppStep::Upload);
                Err(err)
            }
        }
    }

    fn set_step(&mut self, step: AppStep) {
        self.step = step;
        let message = match step {
            AppStep::Analyzing => Some(PROGRESS_SCHEDULE[0].1.to_string()),
            _ => None,
        };
        self.status.send_replace(FlowStatus { step, message });
    }

    fn spawn_progress_ticker(&self) -> JoinHandle<()> {
        let status = self.status.clone();
        let started = Instant::now();
        tokio::spawn(async move {
            for (offset, message) in PROGRESS_SCHEDULE.iter().skip(1) {
                sleep_until(started + *offset).await;
                status.send_modify(|s| s.message = Some(message.to_string()));
            }
        })
    }
}
