//! Path-based value extraction from JSON:API documents
//!
//! Joomla wraps records as `{ "data": { "id", "type", "attributes": {...} } }`
//! and collections as `{ "data": [...], "links": { "next": ... } }`. These
//! helpers read values out of that shape and mirror the loose truthiness the
//! form values arrive with.

use serde_json::Value;

/// Read the value at a `/`-separated path such as `/data/attributes/title`.
/// Numeric segments index into arrays (`/data/0/id`). Missing members and
/// paths through scalars yield `Value::Null`.
pub fn extract_by_path(json: &Value, path: &str) -> Value {
    let mut current = json;
    for part in path.split('/').filter(|s| !s.is_empty()) {
        let next = match current {
            Value::Object(map) => map.get(part),
            Value::Array(arr) => part.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

/// [`extract_by_path`] rendered as text, `default` when absent
pub fn extract_string(json: &Value, path: &str, default: &str) -> String {
    value_to_string(&extract_by_path(json, path), default)
}

/// Convert a JSON value to a display string
pub fn value_to_string(value: &Value, default: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => default.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| value_to_string(v, default))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => default.to_string(),
    }
}

/// Loose truthiness: null, false, 0, "" are false; everything else is true
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether a form value counts as "not filled in" (empty string or null)
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Read `data.attributes.<name>` from a single-record response
pub fn record_attribute(document: &Value, name: &str) -> Value {
    extract_by_path(document, &format!("/data/attributes/{}", name))
}
