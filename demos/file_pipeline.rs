//! File Pipeline Example
//!
//! Demonstrates the buffered, rotating file sink next to a console sink,
//! with per-sink metrics reported at shutdown.
//!
//! Run with: cargo run --bin file_pipeline [output-path]

use std::path::PathBuf;
use std::sync::Arc;

use contracts::{Level, Metadata};
use dispatcher::{ConsoleSink, FileSink, FileSinkConfig, LoggerBuilder};
use formatters::{error_value, JsonFormatter, TextFormatter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./output/demo.log"));

    // Small limits so rotation is observable within one run
    let config = FileSinkConfig {
        path: path.clone(),
        max_bytes: 4096,
        max_files: 3,
        buffer_entries: 8,
    };

    let file_sink = FileSink::new("file", config, Arc::new(JsonFormatter::new()))?;
    let console_sink = ConsoleSink::new("console", Arc::new(TextFormatter::with_prefix("Files")), None);

    let logger = LoggerBuilder::new()
        .min_level(Level::Info)
        .sink(file_sink)
        .sink(console_sink)
        .build();

    for n in 0..200 {
        logger.log(
            Level::Info,
            format!("synthetic event {}", n),
            None,
        );
    }
    // Structured error rendering: the cause lands in metadata as
    // {name, message, stack}
    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "upstream refused");
    let mut metadata = Metadata::new();
    metadata.insert("cause".to_string(), error_value(&io_err));
    logger.log(
        Level::Error,
        "synthetic failure to exercise the error stream",
        Some(metadata),
    );

    // Final counters come back from close, after the queues have drained
    for (name, snapshot) in logger.close().await {
        tracing::info!(
            sink = %name,
            emitted = snapshot.emitted,
            failed = snapshot.failed,
            dropped = snapshot.dropped,
            "Sink metrics"
        );
    }
    tracing::info!(path = %path.display(), "File pipeline finished");

    Ok(())
}
