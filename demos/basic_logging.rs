//! Basic Logging Example
//!
//! Demonstrates the default console pipeline: leveled calls, metadata
//! merging, live subscription and history replay.
//!
//! Run with: cargo run --bin basic_logging

use contracts::{Level, Metadata};
use dispatcher::LoggerBuilder;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Internal diagnostics (sink/listener failures) go through tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    // ==== Stage 1: Build the logger ====
    let mut defaults = Metadata::new();
    defaults.insert("service".to_string(), json!("demo"));

    let logger = LoggerBuilder::new()
        .prefix("Demo")
        .min_level(Level::Debug)
        .default_metadata(defaults)
        .build();

    // ==== Stage 2: Subscribe to live entries ====
    let subscription = logger.subscribe(|entry| {
        eprintln!("(listener) saw entry {} at level {}", entry.id, entry.level);
    });

    // ==== Stage 3: Log at each level ====
    logger.debug("starting up");
    logger.info("ready to serve");
    logger.warn("disk usage above 80%");

    let mut metadata = Metadata::new();
    metadata.insert("attempt".to_string(), json!(3));
    logger.log(Level::Error, "upstream unreachable", Some(metadata));

    subscription.unsubscribe();
    logger.info("listener detached, sinks still running");

    // ==== Stage 4: Replay history and shut down ====
    logger.flush_to_console();
    logger.close().await;

    Ok(())
}
