//! Video deconstruction application layer.
//!
//! This crate provides:
//! - Configuration and logging setup
//! - The upload -> analyze -> result flow
//! - The bilingual brief editing session with debounced auto-translation

pub mod config;
pub mod debounce;
pub mod error;
pub mod flow;
pub mod logging;
pub mod notify;
pub mod session;

pub use config::AppConfig;
pub use debounce::KeyedDebouncer;
pub use error::{FlowError, FlowResult, SessionError, SessionResult};
pub use flow::{AnalysisFlow, FlowStatus, MediaPreview, PROGRESS_SCHEDULE};
pub use logging::init_tracing;
pub use notify::{Notifier, StderrNotifier};
pub use session::{BriefSession, LanguageOption, SyncOutcome, SyncTrigger};
