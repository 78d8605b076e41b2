//! Instrument values and their text rendering

pub use serde_json::Value;

/// Format a value for display.
///
/// Numbers use `decimals` fractional digits, strings are shown verbatim,
/// booleans as `true`/`false` and null as `--`.
pub fn format_value(value: &Value, decimals: usize) -> String {
    match value {
        Value::Null => "--".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format!("{:.*}", decimals, f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value counts as "on" for switches and lights
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
