//! LogSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{LogEntry, LogError};

/// Entry output trait
///
/// All sink implementations must implement this trait. Sinks with nothing
/// to flush or close implement those methods as no-ops; the dispatcher
/// calls them unconditionally.
#[trait_variant::make(LogSink: Send)]
pub trait LocalLogSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Emit one entry
    ///
    /// # Errors
    /// Returns a transport error (should include context)
    async fn emit(&mut self, entry: &LogEntry) -> Result<(), LogError>;

    /// Flush buffered output (if any)
    async fn flush(&mut self) -> Result<(), LogError>;

    /// Close sink; emit/flush become no-ops afterwards
    async fn close(&mut self) -> Result<(), LogError>;
}
