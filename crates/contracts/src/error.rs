//! Layered error definitions
//!
//! Categorized by source: listener / transport / write / construction

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum LogError {
    // ===== Listener Errors =====
    /// A subscriber callback panicked during fan-out
    #[error("listener panicked: {message}")]
    Listener { message: String },

    // ===== Sink Errors =====
    /// Sink emit/flush/close failure
    #[error("sink '{sink_name}' transport error: {message}")]
    Transport { sink_name: String, message: String },

    /// File sink underlying write failure (payload dropped, no retry)
    #[error("sink '{sink_name}' write error: {message}")]
    Write { sink_name: String, message: String },

    /// Sink could not initialize; surfaces synchronously at construction
    #[error("sink '{sink_name}' failed to initialize: {message}")]
    SinkInit { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Create a listener panic error
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener {
            message: message.into(),
        }
    }

    /// Create a sink transport error
    pub fn transport(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create a file write error
    pub fn write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create a sink construction error
    pub fn sink_init(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkInit {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Error kind tag for the operator error channel
    pub fn kind(&self) -> &'static str {
        match self {
            LogError::Listener { .. } => "listener",
            LogError::Transport { .. } => "transport",
            LogError::Write { .. } => "write",
            LogError::SinkInit { .. } => "construction",
            LogError::Io(_) => "io",
            LogError::Other(_) => "other",
        }
    }
}
