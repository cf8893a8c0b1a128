//! Lenient readers for rule parameters held in a `serde_json::Value` object.
//!
//! A missing key, a value of the wrong type, or a non-object `params` yields
//! the default. Rule families validate ranges themselves.

use serde_json::Value;

/// `params[name]` as `f64`; integers are widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// `params[name]` as `usize`; values that do not fit fall back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}
