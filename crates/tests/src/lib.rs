//! # Integration Tests
//!
//! End-to-end tests over the full entry pipeline:
//! - level gating vs. history/subscriber retention
//! - fan-out and failure isolation across sinks and listeners
//! - file sink buffering, rotation and shutdown flushing

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Contract surface stays reachable from downstream crates
        let _ = contracts::Level::Info;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use contracts::{Level, LogEntry, LogError, LogSink, Metadata};
    use dispatcher::{FileSink, FileSinkConfig, IdGenerator, LoggerBuilder};
    use formatters::{error_value, JsonFormatter, TextFormatter};
    use serde_json::Value;
    use tempfile::tempdir;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    /// Sink that stores every received entry, for assertions
    struct CollectSink {
        name: String,
        entries: Arc<Mutex<Vec<LogEntry>>>,
    }

    impl CollectSink {
        fn new(name: &str) -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
            let entries = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    name: name.to_string(),
                    entries: Arc::clone(&entries),
                },
                entries,
            )
        }
    }

    impl LogSink for CollectSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn emit(&mut self, entry: &LogEntry) -> Result<(), LogError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), LogError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), LogError> {
            Ok(())
        }
    }

    fn sequential_ids() -> IdGenerator {
        let counter = Arc::new(AtomicU64::new(0));
        Arc::new(move || format!("custom-{}", counter.fetch_add(1, Ordering::SeqCst) + 1))
    }

    /// Entries at or above the gate reach the sink in call order; entries
    /// below it stay visible in history and to subscribers.
    #[tokio::test]
    async fn test_e2e_level_gate_and_order() {
        init_tracing();
        let (sink, received) = CollectSink::new("collect");
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Info)
            .id_generator(sequential_ids())
            .sink(sink)
            .build();

        logger.debug("gated out");
        logger.info("first");
        logger.warn("second");
        logger.error("third");
        logger.close().await;

        let received = received.lock().unwrap();
        let messages: Vec<_> = received.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);

        // History keeps the gated entry too
        let history = logger.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].message, "gated out");

        // Ids assigned in call order
        assert_eq!(history[0].id, "custom-1");
        assert_eq!(history[3].id, "custom-4");
    }

    /// A panicking listener never blocks other listeners or the sinks.
    #[tokio::test]
    async fn test_e2e_listener_isolation() {
        init_tracing();
        let (sink, received) = CollectSink::new("collect");
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .sink(sink)
            .build();

        let second_hits = Arc::new(AtomicU64::new(0));
        let hits_clone = Arc::clone(&second_hits);

        let _bad = logger.subscribe(|_| panic!("listener exploded"));
        let _good = logger.subscribe(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        logger.info("survives");
        logger.close().await;

        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    /// Subscribers see entries logged between subscribe and unsubscribe,
    /// and nothing after.
    #[tokio::test]
    async fn test_e2e_subscription_window() {
        let (sink, _received) = CollectSink::new("collect");
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .sink(sink)
            .build();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let subscription = logger.subscribe(move |entry: &LogEntry| {
            seen_clone.lock().unwrap().push(entry.message.clone());
        });

        logger.info("inside-1");
        logger.debug("inside-2");
        subscription.unsubscribe();
        logger.info("outside");
        logger.close().await;

        assert_eq!(*seen.lock().unwrap(), vec!["inside-1", "inside-2"]);
    }

    /// Every sink receives every gated-in entry independently.
    #[tokio::test]
    async fn test_e2e_multi_sink_fanout() {
        let (sink_a, received_a) = CollectSink::new("a");
        let (sink_b, received_b) = CollectSink::new("b");
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .sink(sink_a)
            .sink(sink_b)
            .build();

        for n in 0..5 {
            logger.info(format!("entry {}", n));
        }

        let metrics = logger.metrics();
        assert_eq!(metrics.len(), 2);

        logger.close().await;
        assert_eq!(received_a.lock().unwrap().len(), 5);
        assert_eq!(received_b.lock().unwrap().len(), 5);
    }

    /// Full pipeline into a JSON file sink: every line parses back with
    /// the original fields.
    #[tokio::test]
    async fn test_e2e_file_sink_json_lines() {
        init_tracing();
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut config = FileSinkConfig::new(&path);
        config.buffer_entries = 100; // force the close-path flush

        let sink = FileSink::new("file", config, Arc::new(JsonFormatter::new())).unwrap();
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .id_generator(sequential_ids())
            .sink(sink)
            .build();

        logger.info("alpha");
        logger.error("beta");
        logger.close().await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["message"], "alpha");
        assert_eq!(first["level"], "info");
        assert_eq!(first["id"], "custom-1");

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["message"], "beta");
        assert_eq!(second["level"], "error");
    }

    /// Tiny rotation budget: repeated writes leave the active file plus
    /// rotated copies, capped by max_files.
    #[tokio::test]
    async fn test_e2e_file_sink_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rotate.log");

        let config = FileSinkConfig {
            path: path.clone(),
            max_bytes: 128,
            max_files: 2,
            buffer_entries: 1,
        };
        let sink = FileSink::new("file", config, Arc::new(TextFormatter::new())).unwrap();
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .sink(sink)
            .build();

        for n in 0..60 {
            logger.info(format!("rotation filler line number {}", n));
        }
        logger.close().await;

        assert!(path.exists());
        let rotated = path.with_extension("log.1");
        assert!(rotated.exists());
        // Retention cap holds
        assert!(!path.with_extension("log.2").exists());
    }

    /// A sink that always fails never affects its peers.
    #[tokio::test]
    async fn test_e2e_failing_sink_isolation() {
        struct FailingSink;
        impl LogSink for FailingSink {
            fn name(&self) -> &str {
                "failing"
            }
            async fn emit(&mut self, _entry: &LogEntry) -> Result<(), LogError> {
                Err(LogError::transport("failing", "always broken"))
            }
            async fn flush(&mut self) -> Result<(), LogError> {
                Ok(())
            }
            async fn close(&mut self) -> Result<(), LogError> {
                Ok(())
            }
        }

        init_tracing();
        let (sink, received) = CollectSink::new("healthy");
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .sink(FailingSink)
            .sink(sink)
            .build();

        logger.info("one");
        logger.info("two");
        let finals = logger.close().await;

        assert_eq!(received.lock().unwrap().len(), 2);

        // Final counters stay observable after shutdown
        let failing = finals.iter().find(|(name, _)| name == "failing").unwrap();
        assert_eq!(failing.1.failed, 2);
        assert_eq!(failing.1.emitted, 0);
        let healthy = finals.iter().find(|(name, _)| name == "healthy").unwrap();
        assert_eq!(healthy.1.emitted, 2);
        assert_eq!(logger.metrics().len(), 2);
    }

    /// An error attached to metadata renders as name/message/stack and
    /// survives the JSON file pipeline.
    #[tokio::test]
    async fn test_e2e_error_metadata_rendering() {
        init_tracing();
        let dir = tempdir().unwrap();
        let path = dir.path().join("errors.log");

        let mut config = FileSinkConfig::new(&path);
        config.buffer_entries = 100;
        let sink = FileSink::new("file", config, Arc::new(JsonFormatter::new())).unwrap();
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .sink(sink)
            .build();

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe went away");
        let mut metadata = Metadata::new();
        metadata.insert("cause".to_string(), error_value(&io_err));
        logger.log(Level::Error, "write failed", Some(metadata));
        logger.close().await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let line: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        let cause = &line["metadata"]["cause"];
        assert_eq!(cause["message"], "pipe went away");
        assert!(cause["name"].as_str().unwrap().contains("Error"));
        assert!(cause["stack"].is_array());
    }

    /// Default metadata is merged into every entry before fan-out.
    #[tokio::test]
    async fn test_e2e_default_metadata_reaches_sink() {
        let mut defaults = Metadata::new();
        defaults.insert("service".to_string(), Value::String("billing".to_string()));

        let (sink, received) = CollectSink::new("collect");
        let logger = LoggerBuilder::new()
            .attach_platform(false)
            .min_level(Level::Debug)
            .default_metadata(defaults)
            .sink(sink)
            .build();

        logger.info("charged");
        logger.close().await;

        let received = received.lock().unwrap();
        assert_eq!(received[0].metadata["service"], "billing");
    }
}
