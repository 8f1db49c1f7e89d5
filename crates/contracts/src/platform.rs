//! Platform info probe
//!
//! Resolved once at logger construction; the core only consumes the pair.

use serde::{Deserialize, Serialize};

/// Host platform descriptor attached to formatted output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Platform name (e.g. "linux", "macos")
    pub platform: String,
    /// Runtime/application version string
    pub version: String,
}

impl PlatformInfo {
    /// Construct from explicit values
    pub fn new(platform: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            version: version.into(),
        }
    }

    /// Probe the current environment
    ///
    /// Uses the compile-target OS name and this library's version. Hosts
    /// that know better (app version, browser UA, etc.) should construct
    /// the pair themselves.
    pub fn probe() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
