//! Subscriber set with panic-isolated fan-out

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

use contracts::{LogEntry, LogError};

/// Listener callback invoked for every entry, regardless of level
pub type Listener = Arc<dyn Fn(&LogEntry) + Send + Sync>;

/// Set of registered listeners, identity = registration id
///
/// Two structurally identical closures subscribed separately get distinct
/// ids and are removed independently.
#[derive(Default)]
pub(crate) struct SubscriberSet {
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns its id
    pub fn add(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove by id; removing twice or removing an unknown id is a no-op
    pub fn remove(&mut self, id: u64) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Invoke every listener with the entry
    ///
    /// A panicking listener is reported on the error channel and never
    /// prevents the remaining listeners from running.
    pub fn notify(&self, entry: &LogEntry) {
        for (id, listener) in &self.listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(entry))) {
                let err = LogError::listener(panic_message(&panic));
                error!(
                    listener_id = id,
                    entry_id = %entry.id,
                    kind = err.kind(),
                    error = %err,
                    "Listener failed"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
