//! Sink implementations
//!
//! Contains ConsoleSink and FileSink. Network transports are left to
//! host applications as `LogSink` implementations.

mod console;
mod file;

pub use self::console::ConsoleSink;
pub use self::file::{FileSink, FileSinkConfig};
