//! Log entry and severity level definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity level, totally ordered: Debug < Info < Warn < Error
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case label used by text output
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Default minimum level for sink delivery
    ///
    /// Debug builds keep everything; release builds gate below Warn.
    /// Hosts that resolve the environment differently should pass an
    /// explicit level instead.
    pub fn default_min() -> Self {
        if cfg!(debug_assertions) {
            Level::Debug
        } else {
            Level::Warn
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

/// Ordered metadata mapping attached to an entry
pub type Metadata = Map<String, Value>;

/// One immutable record of a single log call
///
/// Created exactly once per call, never mutated afterwards. The dispatcher
/// shares it with sinks and listeners as `Arc<LogEntry>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique entry id (generator-supplied)
    pub id: String,
    /// Severity
    pub level: Level,
    /// Human-readable message
    pub message: String,
    /// Merged metadata; always present, possibly empty
    #[serde(default)]
    pub metadata: Metadata,
    /// Wall-clock milliseconds since the Unix epoch
    pub timestamp: i64,
}
