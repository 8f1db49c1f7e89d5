//! # Dispatcher
//!
//! Logger core module.
//!
//! Responsible for:
//! - Entry construction, metadata merging and the bounded history ring
//! - Subscriber fan-out with panic isolation
//! - Level-gated fan-out to sinks, isolating slow or failing sinks

pub mod config;
pub mod error;
pub mod handle;
pub mod history;
pub mod logger;
pub mod metrics;
pub mod sinks;
pub mod subscribers;

pub use contracts::{
    EntryFormatter, Level, LogEntry, LogError, LogSink, Metadata, PlatformInfo,
};
pub use config::{default_id_generator, IdGenerator, LoggerConfig};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use history::History;
pub use logger::{create_logger, Logger, LoggerBuilder, Subscription};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, FileSink, FileSinkConfig};
pub use subscribers::Listener;
