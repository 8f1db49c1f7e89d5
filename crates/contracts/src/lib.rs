//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Entry timestamps are wall-clock milliseconds since the Unix epoch (i64)
//! - `id` is an opaque string, unique per entry, used for ordering/diagnostics

mod entry;
mod error;
mod formatter;
mod platform;
mod sink;

pub use entry::*;
pub use error::*;
pub use formatter::EntryFormatter;
pub use platform::PlatformInfo;
pub use sink::*;
