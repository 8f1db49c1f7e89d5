//! JsonFormatter - single-line JSON object rendering

use chrono::{SecondsFormat, TimeZone, Utc};
use contracts::{EntryFormatter, LogEntry, PlatformInfo};
use serde_json::{json, Map, Value};

use crate::safe::sanitize;

/// Formats entries as one JSON object per line
///
/// Shape: `{"timestamp": <RFC-3339>, "level", "message", "id",
/// "metadata"?, "platform"?: {"name", "version"}}`. Metadata passes
/// through safe rendering (see [`crate::sanitize`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// Render milliseconds-since-epoch as RFC-3339 with millisecond precision
///
/// Falls back to the raw integer string when the value is outside
/// chrono's representable range.
fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}

impl EntryFormatter for JsonFormatter {
    fn format(&self, entry: &LogEntry, platform: Option<&PlatformInfo>) -> String {
        let mut obj = Map::new();
        obj.insert(
            "timestamp".to_string(),
            Value::String(format_timestamp(entry.timestamp)),
        );
        obj.insert(
            "level".to_string(),
            Value::String(entry.level.as_str().to_lowercase()),
        );
        obj.insert("message".to_string(), Value::String(entry.message.clone()));
        obj.insert("id".to_string(), Value::String(entry.id.clone()));

        if !entry.metadata.is_empty() {
            obj.insert(
                "metadata".to_string(),
                sanitize(&Value::Object(entry.metadata.clone()), 0),
            );
        }

        if let Some(info) = platform {
            obj.insert(
                "platform".to_string(),
                json!({ "name": info.platform, "version": info.version }),
            );
        }

        Value::Object(obj).to_string()
    }
}
