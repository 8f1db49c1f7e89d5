//! Sink delivery counters
//!
//! One `SinkMetrics` is shared between a sink's caller side (queueing,
//! drops) and its worker (emit outcomes). The three totals only ever
//! grow; `queue_depth` is a gauge refreshed by whichever side last moved
//! the queue.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Shared counters for one sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    queue_depth: AtomicUsize,
    emitted: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries waiting in the queue, as last observed
    pub fn queue_depth(&self) -> usize {
        self.queue_depth.load(Ordering::Relaxed)
    }

    /// Refresh the queue-depth gauge
    pub fn observe_queue_depth(&self, depth: usize) {
        self.queue_depth.store(depth, Ordering::Relaxed);
    }

    /// Entries the sink accepted
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Count one successful emit
    pub fn record_emit(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Entries the sink rejected with an error
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Count one failed emit
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Entries dropped at the queue, never handed to the sink
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Count one queue-full drop
    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_depth: self.queue_depth(),
            emitted: self.emitted(),
            failed: self.failed(),
            dropped: self.dropped(),
        }
    }
}

/// Owned copy of a sink's counters, safe to keep past sink shutdown
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSnapshot {
    pub queue_depth: usize,
    pub emitted: u64,
    pub failed: u64,
    pub dropped: u64,
}
