//! Bilingual brief editing with debounced auto-translation.
//!
//! Editing the Chinese side of a section schedules a translation of that
//! section once the operator stops typing. Each section has its own timer.
//! Editing the target side never triggers a translation.
//!
//! Syncs of the same section are cancel-and-replace: every sync takes a new
//! generation number and a response whose generation is no longer the newest
//! for that section is discarded.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use deconstruct_ai::Translator;
use deconstruct_models::{BriefField, ExportSnapshot, SupportedLanguage, VideoBrief};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::debounce::KeyedDebouncer;
use crate::error::SessionResult;
use crate::notify::Notifier;

/// Shown when a manually requested sync fails.
pub const SYNC_FAILED_MESSAGE: &str = "同步翻译失败，请重试。";

/// What started a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// Debounced sync after a Chinese edit; failures are only logged
    Auto,
    /// Explicit refresh; failures are reported to the user
    Manual,
}

/// Result of a sync that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The translation was written to the target side
    Applied,
    /// A newer sync of the same section started; this result was dropped
    Superseded,
}

/// Entry of the target-language picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug)]
struct SessionState {
    brief: VideoBrief,
    /// Newest generation per section with a request in flight
    in_flight: HashMap<BriefField, u64>,
    next_generation: u64,
}

struct SessionInner {
    state: Mutex<SessionState>,
    translator: Arc<dyn Translator>,
    notifier: Arc<dyn Notifier>,
    debouncer: KeyedDebouncer<BriefField>,
    debounce: Duration,
    detected_language: String,
}

/// Cloneable handle to one brief editing session.
#[derive(Clone)]
pub struct BriefSession {
    inner: Arc<SessionInner>,
}

impl BriefSession {
    /// Start a session over `brief`.
    ///
    /// `detected_language` is the source video's language. It stands in for a
    /// blank target language and is reported as the export's source tag.
    /// `debounce` is the idle time after a Chinese edit before its auto-sync.
    pub fn new(
        brief: VideoBrief,
        detected_language: impl Into<String>,
        translator: Arc<dyn Translator>,
        notifier: Arc<dyn Notifier>,
        debounce: Duration,
    ) -> Self {
        let detected_language = detected_language.into();
        let brief = brief.with_fallback_language(&detected_language);

        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(SessionState {
                    brief,
                    in_flight: HashMap::new(),
                    next_generation: 0,
                }),
                translator,
                notifier,
                debouncer: KeyedDebouncer::new(),
                debounce,
                detected_language,
            }),
        }
    }

    pub fn detected_language(&self) -> &str {
        &self.inner.detected_language
    }

    /// Copy of the current brief.
    pub async fn brief(&self) -> VideoBrief {
        self.inner.state.lock().await.brief.clone()
    }

    /// Update the Chinese side of `field` and schedule its auto-sync.
    pub async fn edit_chinese(&self, field: BriefField, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.inner.state.lock().await;
            state.brief.field_mut(field).cn = text.clone();
        }

        let session = Arc::downgrade(&self.inner);
        self.inner
            .debouncer
            .schedule_after(field, self.inner.debounce, auto_sync(session, field, text));
    }

    /// Update the target side of `field`. Never translates.
    pub async fn edit_target(&self, field: BriefField, text: impl Into<String>) {
        let mut state = self.inner.state.lock().await;
        state.brief.field_mut(field).target = text.into();
    }

    /// Translate `field` now.
    ///
    /// Uses `text_override` when given, the current Chinese side otherwise.
    /// A failure is reported to the user and returned.
    pub async fn sync_field(
        &self,
        field: BriefField,
        text_override: Option<String>,
    ) -> SessionResult<SyncOutcome> {
        self.inner
            .run_sync(field, text_override, SyncTrigger::Manual)
            .await
    }

    /// Whether the newest sync of `field` is still waiting for a response.
    pub async fn is_syncing(&self, field: BriefField) -> bool {
        self.inner.state.lock().await.in_flight.contains_key(&field)
    }

    /// Whether an auto-sync of `field` is waiting for the operator to stop typing.
    pub fn has_pending_sync(&self, field: BriefField) -> bool {
        self.inner.debouncer.is_pending(&field)
    }

    /// Change the target language tag. Section texts are left untouched.
    pub async fn change_target_language(&self, language: impl Into<String>) {
        let language = language.into();
        let mut state = self.inner.state.lock().await;
        info!(from = %state.brief.target_language, to = %language, "Target language changed");
        state.brief.target_language = language;
    }

    /// Target-side view of the brief for export.
    pub async fn export_snapshot(&self) -> ExportSnapshot {
        let state = self.inner.state.lock().await;
        ExportSnapshot::from_brief(&state.brief, &self.inner.detected_language, Utc::now())
    }

    /// Target-language choices: the detected language first, then the
    /// standard list without repeating it.
    pub fn language_options(&self) -> Vec<LanguageOption> {
        let detected = self.inner.detected_language.as_str();
        let mut options = vec![LanguageOption {
            value: detected.to_string(),
            label: format!("{} (Original)", detected),
        }];

        let detected_known = SupportedLanguage::from_name(detected);
        options.extend(
            SupportedLanguage::EDITOR_ORDER
                .into_iter()
                .filter(|lang| Some(*lang) != detected_known)
                .map(|lang| LanguageOption {
                    value: lang.as_str().to_string(),
                    label: lang.as_str().to_string(),
                }),
        );
        options
    }
}

async fn auto_sync(session: Weak<SessionInner>, field: BriefField, text: String) {
    // Session closed before the timer fired.
    let Some(inner) = session.upgrade() else {
        return;
    };
    // Auto failures are logged inside run_sync.
    let _ = inner.run_sync(field, Some(text), SyncTrigger::Auto).await;
}

impl SessionInner {
    async fn run_sync(
        &self,
        field: BriefField,
        text_override: Option<String>,
        trigger: SyncTrigger,
    ) -> SessionResult<SyncOutcome> {
        let (generation, text, target_lang) = {
            let mut state = self.state.lock().await;
            state.next_generation += 1;
            let generation = state.next_generation;
            state.in_flight.insert(field, generation);

            let text = text_override.unwrap_or_else(|| state.brief.field(field).cn.clone());
            let target_lang = if state.brief.target_language.trim().is_empty() {
                self.detected_language.clone()
            } else {
                state.brief.target_language.clone()
            };
            (generation, text, target_lang)
        };

        debug!(field = %field, generation, ?trigger, target_lang = %target_lang, "Syncing translation");
        let outcome = self.translator.translate(&text, &target_lang, field).await;

        let mut state = self.state.lock().await;
        if state.in_flight.get(&field) != Some(&generation) {
            debug!(field = %field, generation, "Discarding superseded translation");
            return Ok(SyncOutcome::Superseded);
        }
        state.in_flight.remove(&field);

        match outcome {
            Ok(translated) => {
                state.brief.field_mut(field).target = translated;
                debug!(field = %field, generation, "Translation applied");
                Ok(SyncOutcome::Applied)
            }
            Err(e) => {
                drop(state);
                match trigger {
                    SyncTrigger::Auto => {
                        warn!(field = %field, error = %e, "Auto-sync translation failed");
                    }
                    SyncTrigger::Manual => {
                        warn!(field = %field, error = %e, "Manual translation sync failed");
                        self.notifier.notify(SYNC_FAILED_MESSAGE);
                    }
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SYNC_DEBOUNCE;
    use async_trait::async_trait;
    use deconstruct_ai::{AiError, AiResult};
    use deconstruct_models::DualLanguageField;
    use std::sync::Mutex as StdMutex;
    use tokio::time::sleep;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        text: String,
        target_lang: String,
        field: BriefField,
    }

    /// Records calls; answers `EN:<text>` after `latency`, or fails.
    #[derive(Default)]
    struct FakeTranslator {
        calls: StdMutex<Vec<Call>>,
        latency: HashMap<String, Duration>,
        fail: bool,
    }

    impl FakeTranslator {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(&self, text: &str, target_lang: &str, field: BriefField) -> AiResult<String> {
            self.calls.lock().unwrap().push(Call {
                text: text.to_string(),
                target_lang: target_lang.to_string(),
                field,
            });
            if let Some(latency) = self.latency.get(text) {
                sleep(*latency).await;
            }
            if self.fail {
                return Err(AiError::transport("network down"));
            }
            Ok(format!("EN:{}", text))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: StdMutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn brief() -> VideoBrief {
        VideoBrief {
            shooting_guide: DualLanguageField::new("近景开场", "Close-up opening"),
            script_reference: DualLanguageField::new("大家好", "Olá pessoal"),
            selling_points: DualLanguageField::new("便宜", "Barato"),
            target_language: "Portuguese".to_string(),
        }
    }

    fn session_with(translator: Arc<FakeTranslator>) -> (BriefSession, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let session = BriefSession::new(
            brief(),
            "Portuguese",
            translator,
            notifier.clone(),
            DEFAULT_SYNC_DEBOUNCE,
        );
        (session, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_syncs_once_with_latest_text() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator.clone());

        session.edit_chinese(BriefField::ShootingGuide, "分镜").await;
        sleep(Duration::from_millis(500)).await;
        session.edit_chinese(BriefField::ShootingGuide, "分镜1").await;
        sleep(Duration::from_millis(1000)).await;
        session.edit_chinese(BriefField::ShootingGuide, "分镜1\n分镜2").await;
        assert!(translator.calls().is_empty());
        assert!(session.has_pending_sync(BriefField::ShootingGuide));

        sleep(Duration::from_millis(1600)).await;

        assert_eq!(
            translator.calls(),
            vec![Call {
                text: "分镜1\n分镜2".into(),
                target_lang: "Portuguese".into(),
                field: BriefField::ShootingGuide,
            }]
        );
        let brief = session.brief().await;
        assert_eq!(brief.shooting_guide.cn, "分镜1\n分镜2");
        assert_eq!(brief.shooting_guide.target, "EN:分镜1\n分镜2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_edits_sync_twice_in_order() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator.clone());

        session.edit_chinese(BriefField::SellingPoints, "第一版").await;
        sleep(Duration::from_secs(2)).await;
        session.edit_chinese(BriefField::SellingPoints, "第二版").await;
        sleep(Duration::from_secs(2)).await;

        let texts: Vec<_> = translator.calls().into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["第一版", "第二版"]);
        assert_eq!(session.brief().await.selling_points.target, "EN:第二版");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fields_have_independent_timers() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator.clone());

        session.edit_chinese(BriefField::ShootingGuide, "镜头").await;
        sleep(Duration::from_millis(1000)).await;
        session.edit_chinese(BriefField::SellingPoints, "卖点").await;
        sleep(Duration::from_millis(600)).await;

        // Only the first field's timer has elapsed.
        let fields: Vec<_> = translator.calls().into_iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![BriefField::ShootingGuide]);

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(translator.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_edit_does_not_translate() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator.clone());

        session.edit_target(BriefField::ScriptReference, "Oi gente").await;
        sleep(Duration::from_secs(3)).await;

        assert!(translator.calls().is_empty());
        assert_eq!(session.brief().await.script_reference.target, "Oi gente");
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_sync_uses_current_chinese_text() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, notifier) = session_with(translator.clone());

        let outcome = session.sync_field(BriefField::SellingPoints, None).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(translator.calls()[0].text, "便宜");
        assert_eq!(session.brief().await.selling_points.target, "EN:便宜");
        assert!(!session.is_syncing(BriefField::SellingPoints).await);
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_failure_notifies_and_keeps_target() {
        let translator = Arc::new(FakeTranslator {
            fail: true,
            ..Default::default()
        });
        let (session, notifier) = session_with(translator);

        let result = session.sync_field(BriefField::ShootingGuide, None).await;
        assert!(result.is_err());
        assert_eq!(*notifier.messages.lock().unwrap(), vec![SYNC_FAILED_MESSAGE.to_string()]);
        assert_eq!(session.brief().await.shooting_guide.target, "Close-up opening");
        assert!(!session.is_syncing(BriefField::ShootingGuide).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_failure_is_silent() {
        let translator = Arc::new(FakeTranslator {
            fail: true,
            ..Default::default()
        });
        let (session, notifier) = session_with(translator.clone());

        session.edit_chinese(BriefField::ShootingGuide, "新镜头").await;
        sleep(Duration::from_secs(2)).await;

        assert_eq!(translator.calls().len(), 1);
        assert!(notifier.messages.lock().unwrap().is_empty());
        assert_eq!(session.brief().await.shooting_guide.target, "Close-up opening");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_sync_wins_over_slow_older_one() {
        let mut latency = HashMap::new();
        latency.insert("慢".to_string(), Duration::from_secs(5));
        latency.insert("快".to_string(), Duration::from_millis(100));
        let translator = Arc::new(FakeTranslator {
            latency,
            ..Default::default()
        });
        let (session, _) = session_with(translator);

        let slow = {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .sync_field(BriefField::ScriptReference, Some("慢".into()))
                    .await
            })
        };
        sleep(Duration::from_millis(10)).await;
        assert!(session.is_syncing(BriefField::ScriptReference).await);

        let fast = session
            .sync_field(BriefField::ScriptReference, Some("快".into()))
            .await
            .unwrap();
        assert_eq!(fast, SyncOutcome::Applied);

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, SyncOutcome::Superseded);
        assert_eq!(session.brief().await.script_reference.target, "EN:快");
    }

    #[tokio::test]
    async fn test_changing_language_keeps_texts() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator.clone());
        let before = session.brief().await;

        session.change_target_language("Japanese").await;

        let after = session.brief().await;
        assert_eq!(after.target_language, "Japanese");
        for field in BriefField::ALL {
            assert_eq!(after.field(field), before.field(field));
        }
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sync_falls_back_to_detected_language() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator.clone());
        session.change_target_language("").await;

        session.sync_field(BriefField::SellingPoints, None).await.unwrap();
        assert_eq!(translator.calls()[0].target_lang, "Portuguese");
    }

    #[tokio::test]
    async fn test_export_snapshot_has_no_chinese_text() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator);

        let snapshot = session.export_snapshot().await;
        let json = serde_json::to_string(&snapshot).unwrap();

        for cn in ["近景开场", "大家好", "便宜"] {
            assert!(!json.contains(cn));
        }
        assert_eq!(snapshot.shooting_guide, "Close-up opening");
        assert_eq!(snapshot.source_language, "Portuguese");
        assert!(snapshot.file_name().starts_with("Brief_Portuguese_"));
    }

    #[test]
    fn test_language_options_put_detected_first() {
        let translator = Arc::new(FakeTranslator::default());
        let (session, _) = session_with(translator);

        let options = session.language_options();
        assert_eq!(options[0].label, "Portuguese (Original)");
        assert_eq!(options.len(), 8);
        assert_eq!(
            options.iter().filter(|o| o.value == "Portuguese").count(),
            1
        );
        assert_eq!(options[1].value, "English");
    }

    #[test]
    fn test_blank_target_language_takes_detected() {
        let mut initial = brief();
        initial.target_language = " ".into();
        let session = BriefSession::new(
            initial,
            "Thai",
            Arc::new(FakeTranslator::default()),
            Arc::new(RecordingNotifier::default()),
            DEFAULT_SYNC_DEBOUNCE,
        );
        assert_eq!(session.detected_language(), "Thai");
        let brief = tokio_test::block_on(session.brief());
        assert_eq!(brief.target_language, "Thai");
    }
}
