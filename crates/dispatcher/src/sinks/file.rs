//! FileSink - buffered, size-rotated file output

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use contracts::{EntryFormatter, LogEntry, LogError, LogSink};

use crate::error::DispatcherError;

/// Configuration for FileSink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSinkConfig {
    /// Active output file path; rotated copies live at `path.1`, `path.2`, ...
    pub path: PathBuf,
    /// Rotate before a write would push the active file past this size.
    /// Writing exactly up to the limit is allowed.
    pub max_bytes: u64,
    /// Retention cap for the rename cascade; must be >= 1
    pub max_files: usize,
    /// Buffered entry count that triggers a flush
    pub buffer_entries: usize,
}

impl FileSinkConfig {
    /// Create a config with default sizing for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: 5 * 1024 * 1024,
            max_files: 5,
            buffer_entries: 16,
        }
    }
}

/// Sink that appends formatted lines to a rotating file
///
/// Lines are buffered and written in one payload when the buffer reaches
/// `buffer_entries`, on explicit flush, or on close. A failed write drops
/// that payload; there is no retry or re-buffering.
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    formatter: Arc<dyn EntryFormatter>,
    /// Formatted lines awaiting write, oldest first
    buffer: Vec<String>,
    /// Known size of the active file in bytes
    current_bytes: u64,
    /// Append handle, opened on first write and after rotation
    file: Option<File>,
    closed: bool,
}

impl FileSink {
    /// Create a new FileSink
    ///
    /// Creates the parent directory and determines the current on-disk
    /// size of an existing target file (0 if absent). The output handle is
    /// opened on the first write, so an unflushed sink leaves no file.
    pub fn new(
        name: impl Into<String>,
        config: FileSinkConfig,
        formatter: Arc<dyn EntryFormatter>,
    ) -> Result<Self, DispatcherError> {
        let name = name.into();

        if config.max_files == 0 {
            return Err(DispatcherError::sink_creation(
                &name,
                "max_files must be >= 1",
            ));
        }

        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| DispatcherError::sink_creation(&name, e.to_string()))?;
            }
        }

        let current_bytes = fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            name,
            config,
            formatter,
            buffer: Vec::new(),
            current_bytes,
            file: None,
            closed: false,
        })
    }

    fn open_append(path: &PathBuf) -> std::io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// Path for rotation index; index 0 is the unsuffixed base path
    fn rotated_path(&self, index: usize) -> PathBuf {
        if index == 0 {
            self.config.path.clone()
        } else {
            let mut os = self.config.path.clone().into_os_string();
            os.push(format!(".{}", index));
            PathBuf::from(os)
        }
    }

    /// Rename cascade enforcing the retention cap
    ///
    /// Counting down from `max_files - 1`: the file at that top index is
    /// deleted outright, every other index i is renamed to i + 1, and the
    /// base path reopens empty.
    fn rotate(&mut self) -> std::io::Result<()> {
        self.file = None;

        let top = self.config.max_files - 1;
        for index in (0..self.config.max_files).rev() {
            let src = self.rotated_path(index);
            if !src.exists() {
                continue;
            }
            if index == top {
                fs::remove_file(&src)?;
            } else {
                fs::rename(&src, self.rotated_path(index + 1))?;
            }
        }

        self.current_bytes = 0;
        self.file = Some(Self::open_append(&self.config.path)?);
        debug!(sink = %self.name, path = %self.config.path.display(), "Rotated");
        Ok(())
    }

    /// Drain the pending buffer into one write
    ///
    /// The buffer is cleared before the write so entries arriving during
    /// an in-flight flush accumulate into a fresh buffer. A failed write
    /// loses this payload only.
    fn flush_pending(&mut self) -> Result<(), LogError> {
        if self.closed || self.buffer.is_empty() {
            return Ok(());
        }

        let payload: String = std::mem::take(&mut self.buffer).concat();

        if self.current_bytes + payload.len() as u64 > self.config.max_bytes {
            self.rotate()
                .map_err(|e| LogError::write(&self.name, format!("rotate failed: {}", e)))?;
        }

        if self.file.is_none() {
            self.file = Some(
                Self::open_append(&self.config.path)
                    .map_err(|e| LogError::write(&self.name, e.to_string()))?,
            );
        }

        // Invariant: rotate()/the branch above leave an open handle
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LogError::write(&self.name, "output handle not open"))?;

        file.write_all(payload.as_bytes()).map_err(|e| {
            error!(
                sink = %self.name,
                bytes = payload.len(),
                error = %e,
                "Write failed, payload dropped"
            );
            LogError::write(&self.name, e.to_string())
        })?;

        self.current_bytes += payload.len() as u64;
        Ok(())
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_emit",
        skip(self, entry),
        fields(sink = %self.name, entry_id = %entry.id)
    )]
    async fn emit(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        if self.closed {
            return Ok(());
        }

        let mut line = self.formatter.format(entry, None);
        line.push('\n');
        self.buffer.push(line);

        if self.buffer.len() >= self.config.buffer_entries {
            self.flush_pending()?;
        }
        Ok(())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), LogError> {
        self.flush_pending()
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), LogError> {
        if self.closed {
            return Ok(());
        }

        // Flush completes before the closed flag is set
        let flush_result = self.flush_pending();
        self.closed = true;

        let sync_result = match self.file.take() {
            Some(file) => file
                .sync_all()
                .map_err(|e| LogError::transport(&self.name, e.to_string())),
            None => Ok(()),
        };

        debug!(sink = %self.name, "FileSink closed");
        flush_result.and(sync_result)
    }
}
