//! ConsoleSink - writes formatted entries to the process streams

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{debug, instrument};

use contracts::{EntryFormatter, Level, LogEntry, LogError, LogSink, PlatformInfo};

/// Sink that routes formatted entries to stdout/stderr by level
///
/// Error and warn go to stderr, everything else to stdout. Stateless
/// aside from the bound formatter and platform context; flush and close
/// are no-ops.
pub struct ConsoleSink {
    name: String,
    formatter: Arc<dyn EntryFormatter>,
    platform: Option<PlatformInfo>,
}

impl ConsoleSink {
    /// Create a new ConsoleSink
    pub fn new(
        name: impl Into<String>,
        formatter: Arc<dyn EntryFormatter>,
        platform: Option<PlatformInfo>,
    ) -> Self {
        Self {
            name: name.into(),
            formatter,
            platform,
        }
    }

    fn write_line(&self, level: Level, line: &str) -> io::Result<()> {
        match level {
            Level::Error | Level::Warn => writeln!(io::stderr().lock(), "{}", line),
            _ => writeln!(io::stdout().lock(), "{}", line),
        }
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "console_sink_emit",
        skip(self, entry),
        fields(sink = %self.name, entry_id = %entry.id)
    )]
    async fn emit(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        let line = self.formatter.format(entry, self.platform.as_ref());
        self.write_line(entry.level, &line)
            .map_err(|e| LogError::transport(&self.name, e.to_string()))
    }

    #[instrument(name = "console_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), LogError> {
        // Nothing buffered
        Ok(())
    }

    #[instrument(name = "console_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), LogError> {
        debug!(sink = %self.name, "ConsoleSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Metadata;
    use formatters::TextFormatter;

    fn entry(level: Level) -> LogEntry {
        LogEntry {
            id: "c-1".to_string(),
            level,
            message: "console test".to_string(),
            metadata: Metadata::new(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_console_sink_emit() {
        let mut sink = ConsoleSink::new("console", Arc::new(TextFormatter::new()), None);
        assert!(sink.emit(&entry(Level::Info)).await.is_ok());
        assert!(sink.emit(&entry(Level::Error)).await.is_ok());
    }

    #[tokio::test]
    async fn test_console_sink_name() {
        let sink = ConsoleSink::new("my_console", Arc::new(TextFormatter::new()), None);
        assert_eq!(sink.name(), "my_console");
    }
}
