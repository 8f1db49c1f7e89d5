//! EntryFormatter trait - entry to string rendering interface
//!
//! Formatters are pure and stateless aside from bound configuration.

use crate::{LogEntry, PlatformInfo};

/// Entry rendering trait
///
/// Implementations must be pure: same entry and platform in, same string out.
pub trait EntryFormatter: Send + Sync {
    /// Render one entry to a single-line string (no trailing newline)
    fn format(&self, entry: &LogEntry, platform: Option<&PlatformInfo>) -> String;
}
