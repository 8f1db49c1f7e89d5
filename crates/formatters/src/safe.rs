//! Safe metadata value rendering
//!
//! Owned `serde_json::Value` trees cannot be cyclic, so the remaining
//! hazard is unbounded nesting; anything past the depth cap renders as
//! the sentinel instead of recursing.

use serde_json::{json, Value};

/// Sentinel emitted for values nested past [`MAX_DEPTH`]
pub const CIRCULAR_SENTINEL: &str = "[Circular Reference]";

/// Maximum nesting depth rendered literally
pub const MAX_DEPTH: usize = 32;

/// Clone a value, replacing everything past the depth cap with the sentinel
pub fn sanitize(value: &Value, depth: usize) -> Value {
    if depth >= MAX_DEPTH {
        return Value::String(CIRCULAR_SENTINEL.to_string());
    }
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| sanitize(v, depth + 1)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize(v, depth + 1)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Render an error as a `{name, message, stack}` metadata value
///
/// `stack` is the source chain, outermost first.
pub fn error_value<E: std::error::Error>(err: &E) -> Value {
    let mut stack = Vec::new();
    let mut current: Option<&dyn std::error::Error> = Some(err);
    while let Some(e) = current {
        stack.push(Value::String(e.to_string()));
        current = e.source();
    }
    json!({
        "name": std::any::type_name::<E>(),
        "message": err.to_string(),
        "stack": stack,
    })
}
