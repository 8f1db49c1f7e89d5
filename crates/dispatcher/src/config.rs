//! Logger configuration

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use contracts::{Level, Metadata};

/// Default bounded history capacity
pub const DEFAULT_MAX_HISTORY: usize = 200;

/// Default per-sink queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Entry-id generator function
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Logger configuration, immutable for one logger instance's lifetime
#[derive(Clone)]
pub struct LoggerConfig {
    /// Prefix bound into the default text formatter
    pub prefix: Option<String>,
    /// History ring capacity (0 disables history)
    pub max_history: usize,
    /// Minimum level delivered to sinks; history and subscribers keep
    /// everything
    pub min_level: Level,
    /// Probe platform info once at construction and bind it into the
    /// default sink's formatting context
    pub attach_platform: bool,
    /// Metadata merged into every entry (supplied metadata wins per key)
    pub default_metadata: Metadata,
    /// Entry-id generator; time+random when unset
    pub id_generator: Option<IdGenerator>,
    /// Per-sink queue bound; entries are dropped (and counted) when a
    /// sink's queue is full
    pub queue_capacity: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            max_history: DEFAULT_MAX_HISTORY,
            min_level: Level::default_min(),
            attach_platform: true,
            default_metadata: Metadata::new(),
            id_generator: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("prefix", &self.prefix)
            .field("max_history", &self.max_history)
            .field("min_level", &self.min_level)
            .field("attach_platform", &self.attach_platform)
            .field("default_metadata", &self.default_metadata)
            .field("id_generator", &self.id_generator.as_ref().map(|_| "<fn>"))
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

/// Default time+random id generator
///
/// Format: `<millis-hex>-<random-hex>`; unique enough for per-process
/// entry identity, not globally.
pub fn default_id_generator() -> IdGenerator {
    Arc::new(|| {
        let millis = Utc::now().timestamp_millis();
        let salt: u32 = rand::rng().random();
        format!("{:x}-{:08x}", millis, salt)
    })
}
