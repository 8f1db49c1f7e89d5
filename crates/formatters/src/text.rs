//! TextFormatter - human-readable single-line rendering

use contracts::{EntryFormatter, LogEntry, PlatformInfo};
use serde_json::Value;

use crate::safe::sanitize;

/// Formats entries as `[prefix][LEVEL] message {metadata} [platform/version]`
///
/// Prefix, metadata and platform segments are omitted when absent or empty.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    prefix: Option<String>,
}

impl TextFormatter {
    /// Create a formatter without a prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with a bound prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl EntryFormatter for TextFormatter {
    fn format(&self, entry: &LogEntry, platform: Option<&PlatformInfo>) -> String {
        let mut out = String::new();

        if let Some(prefix) = &self.prefix {
            out.push('[');
            out.push_str(prefix);
            out.push(']');
        }

        out.push('[');
        out.push_str(entry.level.as_str());
        out.push_str("] ");
        out.push_str(&entry.message);

        if !entry.metadata.is_empty() {
            let rendered = sanitize(&Value::Object(entry.metadata.clone()), 0);
            out.push(' ');
            out.push_str(&rendered.to_string());
        }

        if let Some(info) = platform {
            out.push_str(&format!(" [{}/{}]", info.platform, info.version));
        }

        out
    }
}
