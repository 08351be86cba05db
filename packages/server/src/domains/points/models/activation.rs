//! Coercion of the stored `activo` flag into a boolean.
//!
//! Legacy writers stored the flag as a JSON boolean, a number, or a string.
//! Reads always go through [`normalize_active`]; nothing else inspects the
//! raw value.

use serde_json::Value;

/// Normalize a raw stored flag. Absent and null mean active.
pub fn normalize_active(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
        Some(Value::String(text)) => parse_flag(text),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Textual flag: case-insensitive "true" or "1".
pub fn parse_flag(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("true") || text == "1"
}
