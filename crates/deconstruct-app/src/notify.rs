//! User-facing notifications.

use tracing::warn;

/// Blocking, user-visible message sink (an alert in a UI shell).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Prints notifications to stderr and records them in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        warn!(notification = %message, "User notified");
        eprintln!("{}", message);
    }
}
