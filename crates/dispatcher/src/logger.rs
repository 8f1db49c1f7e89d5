//! Logger - entry construction, history, subscribers, and sink fan-out

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use chrono::Utc;
use tracing::{error, info, instrument};

use contracts::{EntryFormatter, Level, LogEntry, LogSink, Metadata, PlatformInfo};
use formatters::TextFormatter;

use crate::config::{default_id_generator, IdGenerator, LoggerConfig};
use crate::handle::SinkHandle;
use crate::history::History;
use crate::metrics::MetricsSnapshot;
use crate::sinks::ConsoleSink;
use crate::subscribers::{Listener, SubscriberSet};

/// State mutated on every log call, serialized under one lock so entries
/// reach the history, the listeners and each sink queue in call order even
/// with parallel callers
struct Shared {
    history: History,
    subscribers: SubscriberSet,
    handles: Vec<SinkHandle>,
    /// Final counters of sinks that have been shut down
    retired: Vec<(String, MetricsSnapshot)>,
}

struct LoggerInner {
    min_level: Level,
    default_metadata: Metadata,
    id_generator: IdGenerator,
    platform: Option<PlatformInfo>,
    formatter: Arc<dyn EntryFormatter>,
    shared: Mutex<Shared>,
}

/// Builder for creating a Logger
pub struct LoggerBuilder {
    config: LoggerConfig,
    formatter: Option<Arc<dyn EntryFormatter>>,
    sinks: Vec<Box<dyn FnOnce(usize) -> SinkHandle + Send>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    /// Create a builder from an explicit configuration
    pub fn with_config(config: LoggerConfig) -> Self {
        Self {
            config,
            formatter: None,
            sinks: Vec::new(),
        }
    }

    /// Set the formatter prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    /// Set the history capacity
    pub fn max_history(mut self, capacity: usize) -> Self {
        self.config.max_history = capacity;
        self
    }

    /// Set the minimum level delivered to sinks
    pub fn min_level(mut self, level: Level) -> Self {
        self.config.min_level = level;
        self
    }

    /// Enable or disable the one-time platform probe
    pub fn attach_platform(mut self, attach: bool) -> Self {
        self.config.attach_platform = attach;
        self
    }

    /// Set metadata merged into every entry
    pub fn default_metadata(mut self, metadata: Metadata) -> Self {
        self.config.default_metadata = metadata;
        self
    }

    /// Set the entry-id generator
    pub fn id_generator(mut self, generator: IdGenerator) -> Self {
        self.config.id_generator = Some(generator);
        self
    }

    /// Set the per-sink queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the formatter used by the default console sink
    pub fn formatter(mut self, formatter: Arc<dyn EntryFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Add a sink; its worker task is spawned at build time
    pub fn sink<S: LogSink + Send + 'static>(mut self, sink: S) -> Self {
        self.sinks
            .push(Box::new(move |capacity| SinkHandle::spawn(sink, capacity)));
        self
    }

    /// Build the logger, spawning one worker task per sink
    ///
    /// With no sink added, a console sink bound to the configured
    /// formatter (and the platform info, when enabled) is installed.
    /// Must be called within a tokio runtime.
    #[instrument(name = "logger_build", skip(self), fields(sinks = self.sinks.len()))]
    pub fn build(self) -> Logger {
        let config = self.config;

        // Probed once; never re-probed per entry
        let platform = config.attach_platform.then(PlatformInfo::probe);

        let formatter: Arc<dyn EntryFormatter> = self.formatter.unwrap_or_else(|| {
            match &config.prefix {
                Some(prefix) => Arc::new(TextFormatter::with_prefix(prefix)),
                None => Arc::new(TextFormatter::new()),
            }
        });

        let mut handles: Vec<SinkHandle> = self
            .sinks
            .into_iter()
            .map(|spawn| spawn(config.queue_capacity))
            .collect();

        if handles.is_empty() {
            let console = ConsoleSink::new("console", Arc::clone(&formatter), platform.clone());
            handles.push(SinkHandle::spawn(console, config.queue_capacity));
        }

        info!(
            sinks = handles.len(),
            min_level = %config.min_level,
            max_history = config.max_history,
            "Logger started"
        );

        Logger {
            inner: Arc::new(LoggerInner {
                min_level: config.min_level,
                default_metadata: config.default_metadata,
                id_generator: config.id_generator.unwrap_or_else(default_id_generator),
                platform,
                formatter,
                shared: Mutex::new(Shared {
                    history: History::new(config.max_history),
                    subscribers: SubscriberSet::new(),
                    handles,
                    retired: Vec::new(),
                }),
            }),
        }
    }
}

/// The logging facility's dispatcher core
///
/// Cheap to clone; all clones share one history, subscriber set and sink
/// fan-out. `log` is synchronous and infallible: downstream sink and
/// listener failures are reported on the tracing error channel, never to
/// the caller.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Record one entry
    ///
    /// The entry always lands in the history and reaches every
    /// subscriber; sinks only see it when `level` is at or above the
    /// configured minimum. Sink I/O happens on the sink workers - this
    /// call only queues.
    pub fn log(&self, level: Level, message: impl Into<String>, metadata: Option<Metadata>) {
        let inner = &self.inner;

        let mut merged = inner.default_metadata.clone();
        if let Some(extra) = metadata {
            for (key, value) in extra {
                merged.insert(key, value);
            }
        }

        let entry = Arc::new(LogEntry {
            id: (inner.id_generator)(),
            level,
            message: message.into(),
            metadata: merged,
            timestamp: Utc::now().timestamp_millis(),
        });

        let mut shared = lock_shared(&inner.shared);
        shared.history.push(Arc::clone(&entry));
        shared.subscribers.notify(&entry);

        // Level gate: history and subscribers keep everything, sinks are
        // the production output path
        if level < inner.min_level {
            return;
        }

        for handle in &shared.handles {
            handle.try_send(Arc::clone(&entry));
        }
    }

    /// Log at debug level
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message, None);
    }

    /// Log at info level
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message, None);
    }

    /// Log at warn level
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message, None);
    }

    /// Log at error level
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message, None);
    }

    /// Cloned history snapshot, oldest-first
    pub fn history(&self) -> Vec<LogEntry> {
        lock_shared(&self.inner.shared).history.snapshot()
    }

    /// Register a listener invoked for every subsequent entry
    ///
    /// The listener runs inline with `log`; it must not call back into
    /// the same logger. Dropping the returned subscription does NOT
    /// unsubscribe; call [`Subscription::unsubscribe`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let id = lock_shared(&self.inner.shared).subscribers.add(listener);
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Replay the history to the process streams
    ///
    /// Each line carries a `[History]` marker so replayed entries are
    /// distinguishable from live sink output; error and warn route to
    /// stderr, the rest to stdout. The merged metadata and the bound
    /// platform info ride along as a side segment, separate from the
    /// formatted string.
    pub fn flush_to_console(&self) {
        let inner = &self.inner;
        let entries = lock_shared(&inner.shared).history.entries();

        let platform_side = match &inner.platform {
            Some(info) => format!(" [{}/{}]", info.platform, info.version),
            None => String::new(),
        };

        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();
        for entry in entries {
            let metadata_side = if entry.metadata.is_empty() {
                String::new()
            } else {
                format!(
                    " {}",
                    serde_json::Value::Object(entry.metadata.clone())
                )
            };
            let line = format!(
                "[History] {}{}{}",
                inner.formatter.format(&entry, None),
                metadata_side,
                platform_side
            );
            let result = match entry.level {
                Level::Error | Level::Warn => writeln!(stderr, "{}", line),
                _ => writeln!(stdout, "{}", line),
            };
            if let Err(e) = result {
                error!(error = %e, "History replay write failed");
            }
        }
    }

    /// Current counters per sink
    ///
    /// Live sinks report their running counters; sinks already shut down
    /// keep reporting the final counters captured at close.
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        let shared = lock_shared(&self.inner.shared);
        let mut out: Vec<(String, MetricsSnapshot)> = shared
            .handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect();
        out.extend(shared.retired.iter().cloned());
        out
    }

    /// Shut down every sink concurrently
    ///
    /// Each worker drains its queue, flushes, then closes its sink;
    /// per-sink failures are reported and isolated. Returns the final
    /// per-sink counters, which [`Logger::metrics`] also keeps serving
    /// afterwards. Idempotent - calling again returns the same counters.
    /// Never fails.
    #[instrument(name = "logger_close", skip(self))]
    pub async fn close(&self) -> Vec<(String, MetricsSnapshot)> {
        let handles = std::mem::take(&mut lock_shared(&self.inner.shared).handles);
        if handles.is_empty() {
            return lock_shared(&self.inner.shared).retired.clone();
        }

        let mut joins = Vec::with_capacity(handles.len());
        for handle in handles {
            let name = handle.name().to_string();
            joins.push((name, tokio::spawn(handle.shutdown())));
        }
        let mut finals = Vec::with_capacity(joins.len());
        for (name, join) in joins {
            match join.await {
                Ok(snapshot) => finals.push((name, snapshot)),
                Err(e) => error!(sink = %name, error = ?e, "Sink shutdown task panicked"),
            }
        }

        lock_shared(&self.inner.shared)
            .retired
            .extend(finals.iter().cloned());

        info!("Logger shutdown complete");
        finals
    }
}

/// Capability to remove exactly one listener registration
///
/// Unsubscribing twice, or after the logger is gone, is a no-op.
pub struct Subscription {
    id: u64,
    inner: Weak<LoggerInner>,
}

impl Subscription {
    /// Remove the listener this subscription was returned for
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            lock_shared(&inner.shared).subscribers.remove(self.id);
        }
    }
}

// A panicking listener is already caught inside notify(), so a poisoned
// lock carries no broken invariants; recover the guard.
fn lock_shared(shared: &Mutex<Shared>) -> std::sync::MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Convenience factory for a logger from configuration
///
/// Hosts own the instance at their composition root; the library keeps no
/// global state.
pub fn create_logger(config: LoggerConfig) -> Logger {
    LoggerBuilder::with_config(config).build()
}
