//! Per-sink delivery: a bounded queue in front of a dedicated worker task
//!
//! Every sink gets its own queue and worker so a slow or failing sink
//! never stalls the caller or its peers. The caller side only ever
//! `try_send`s; the worker owns the sink and is the only code touching it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{LogEntry, LogSink};

use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// Upper bound on entries the worker pulls off the queue per wakeup
const DRAIN_CHUNK: usize = 32;

/// Caller-side handle to one sink's queue and worker
pub struct SinkHandle {
    name: String,
    tx: mpsc::Sender<Arc<LogEntry>>,
    queue_capacity: usize,
    metrics: Arc<SinkMetrics>,
    worker: JoinHandle<()>,
}

impl SinkHandle {
    /// Put `sink` behind a queue of `queue_capacity` and start its worker
    pub fn spawn<S: LogSink + Send + 'static>(sink: S, queue_capacity: usize) -> Self {
        let name = sink.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity);
        let metrics = Arc::new(SinkMetrics::new());

        let worker = tokio::spawn(run_sink(sink, rx, Arc::clone(&metrics), name.clone()));

        Self {
            name,
            tx,
            queue_capacity,
            metrics,
            worker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Queue an entry without blocking
    ///
    /// Returns false when the entry was discarded. A full queue drops the
    /// entry and counts it; accepted entries reach the sink in send order.
    pub fn try_send(&self, entry: Arc<LogEntry>) -> bool {
        match self.tx.try_send(entry) {
            Ok(()) => {
                // tx.capacity() is the remaining headroom
                let depth = self.queue_capacity - self.tx.capacity();
                self.metrics.observe_queue_depth(depth);
                true
            }
            Err(mpsc::error::TrySendError::Full(entry)) => {
                self.metrics.record_drop();
                warn!(
                    sink = %self.name,
                    entry_id = %entry.id,
                    "Sink queue full, dropping entry"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(sink = %self.name, "Sink worker gone, entry discarded");
                false
            }
        }
    }

    /// Close the queue, wait for the worker to drain, flush and close the
    /// sink, and hand back the sink's final counters
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) -> MetricsSnapshot {
        let Self {
            name,
            tx,
            metrics,
            worker,
            ..
        } = self;
        drop(tx);
        if let Err(e) = worker.await {
            error!(sink = %name, error = ?e, "Sink worker panicked");
        }
        metrics.snapshot()
    }
}

/// Worker loop that owns the sink
///
/// Drains the queue in chunks and emits in arrival order. A failing emit
/// is counted and reported, then the loop keeps going. Once the queue is
/// closed and empty the sink is flushed before it is closed, so every
/// accepted entry has been handed over by the time shutdown resolves.
async fn run_sink<S: LogSink>(
    mut sink: S,
    mut rx: mpsc::Receiver<Arc<LogEntry>>,
    metrics: Arc<SinkMetrics>,
    name: String,
) {
    debug!(sink = %name, "Sink worker up");

    let mut chunk = Vec::with_capacity(DRAIN_CHUNK);
    loop {
        let pulled = rx.recv_many(&mut chunk, DRAIN_CHUNK).await;
        if pulled == 0 {
            // Queue closed and fully drained
            break;
        }
        metrics.observe_queue_depth(rx.len());

        for entry in chunk.drain(..) {
            match sink.emit(&entry).await {
                Ok(()) => metrics.record_emit(),
                Err(e) => {
                    metrics.record_failure();
                    error!(
                        sink = %name,
                        entry_id = %entry.id,
                        kind = e.kind(),
                        error = %e,
                        "Sink emit failed"
                    );
                }
            }
        }
    }

    if let Err(e) = sink.flush().await {
        error!(sink = %name, kind = e.kind(), error = %e, "Final flush failed");
    }
    if let Err(e) = sink.close().await {
        error!(sink = %name, kind = e.kind(), error = %e, "Sink close failed");
    }

    debug!(sink = %name, "Sink worker down");
}
