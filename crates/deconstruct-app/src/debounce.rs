//! Per-key cancellable delayed actions.
//!
//! `schedule_after(key, delay, action)` runs `action` once `delay` has passed
//! without another schedule for the same key. Scheduling again replaces the
//! pending action, which is dropped without running. Keys are independent.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Debouncer keyed by `K`.
///
/// Must be used from within a tokio runtime.
pub struct KeyedDebouncer<K> {
    pending: Mutex<HashMap<K, JoinHandle<()>>>,
}

impl<K> Default for KeyedDebouncer<K> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedDebouncer<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`, cancelling any pending action for `key`.
    ///
    /// Once the delay elapses the action is spawned on its own task, so a
    /// later schedule for the same key never aborts an action that is
    /// already running.
    pub fn schedule_after<F>(&self, key: K, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.insert(key.clone(), handle) {
            if !previous.is_finished() {
                trace!(key = ?key, "Replacing pending debounced action");
            }
            previous.abort();
        }
    }

    /// Cancel the pending action for `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.remove(key) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether an action for `key` is still waiting for its delay.
    pub fn is_pending(&self, key: &K) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.get(key).is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel every pending action.
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }
}

impl<K> Drop for KeyedDebouncer<K> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }
}
