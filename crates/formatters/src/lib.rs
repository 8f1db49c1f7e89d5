//! # Formatters
//!
//! Built-in entry formatters behind the `EntryFormatter` contract.
//!
//! Contains:
//! - `TextFormatter`: human-readable single line
//! - `JsonFormatter`: single-line JSON object with safe value rendering

mod json;
mod safe;
mod text;

pub use contracts::EntryFormatter;
pub use json::JsonFormatter;
pub use safe::{error_value, sanitize, CIRCULAR_SENTINEL, MAX_DEPTH};
pub use text::TextFormatter;
