//! Form values to request body mapping
//!
//! Turns the loosely typed collections a user fills in (additional fields,
//! update fields, custom field entries) into Joomla request bodies.

use serde_json::{Map, Value};
use tracing::trace;

use super::path_extractor::{is_blank, is_truthy, value_to_string};

/// Outcome of reading a field that holds JSON as text
#[derive(Debug, Clone, PartialEq)]
pub enum JsonText {
    /// The text was valid JSON
    Parsed(Value),
    /// The text was not valid JSON and is passed through untouched
    Raw(String),
}

impl JsonText {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => JsonText::Parsed(value),
            Err(e) => {
                trace!("Keeping raw text, not valid JSON: {}", e);
                JsonText::Raw(text.to_string())
            }
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            JsonText::Parsed(value) => value,
            JsonText::Raw(text) => Value::String(text),
        }
    }
}

/// Copy every filled-in entry into `body`.
///
/// Entries that are `""` or `null` are skipped. Keys listed in `json_fields`
/// holding a string are parsed as JSON, falling back to the raw string.
pub fn copy_fields(
    body: &mut Map<String, Value>,
    fields: &Map<String, Value>,
    json_fields: &[&str],
) {
    for (key, value) in fields {
        if is_blank(value) {
            continue;
        }
        let mapped = match value {
            Value::String(text) if json_fields.contains(&key.as_str()) => {
                JsonText::parse(text).into_value()
            }
            _ => value.clone(),
        };
        body.insert(key.clone(), mapped);
    }
}

/// Like [`copy_fields`], but only for keys in `allowed`; others are dropped
pub fn copy_allowed_fields(
    body: &mut Map<String, Value>,
    fields: &Map<String, Value>,
    allowed: &[&str],
) {
    for (key, value) in fields {
        if !is_blank(value) && allowed.contains(&key.as_str()) {
            body.insert(key.clone(), value.clone());
        }
    }
}

/// One row of the repeatable custom field sub-form.
///
/// `field_value` is `None` only when the row has no `fieldValue` key; an
/// explicit `null` is kept so the field gets cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomFieldEntry {
    pub field_name: String,
    pub field_value: Option<Value>,
}

impl CustomFieldEntry {
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            field_name: name.to_string(),
            field_value: Some(value),
        }
    }
}

impl CustomFieldEntry {
    /// Read a sub-form row. Rows whose name is missing or falsy are skipped;
    /// non-string names are rendered as text.
    fn from_row(row: &Map<String, Value>) -> Option<Self> {
        let name = row.get("fieldName").filter(|n| is_truthy(n))?;
        let field_name = value_to_string(name, "");
        if field_name.is_empty() {
            return None;
        }
        Some(Self {
            field_name,
            field_value: row.get("fieldValue").cloned(),
        })
    }
}

/// Read the `{ "field": [...] }` shape of the custom fields sub-form
pub fn parse_custom_field_entries(collection: &Value) -> Vec<CustomFieldEntry> {
    collection
        .get("field")
        .and_then(|f| f.as_array())
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.as_object())
                .filter_map(CustomFieldEntry::from_row)
                .collect()
        })
        .unwrap_or_default()
}

/// Split a comma-separated value into trimmed parts (checkbox/multi-select
/// encoding). Values without a comma are returned unchanged.
pub fn split_multi_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.contains(',') => Value::Array(
            s.split(',')
                .map(|part| Value::String(part.trim().to_string()))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Fold custom field rows into a `com_fields` object. Returns `None` when no
/// row has both a name and a value.
pub fn fold_custom_fields(entries: &[CustomFieldEntry]) -> Option<Map<String, Value>> {
    let mut com_fields = Map::new();
    for entry in entries {
        if entry.field_name.is_empty() {
            continue;
        }
        if let Some(value) = &entry.field_value {
            com_fields.insert(entry.field_name.clone(), split_multi_value(value));
        }
    }
    if com_fields.is_empty() {
        None
    } else {
        Some(com_fields)
    }
}

/// Attach `com_fields` to a body when any custom field was given
pub fn apply_custom_fields(body: &mut Map<String, Value>, entries: &[CustomFieldEntry]) {
    if let Some(com_fields) = fold_custom_fields(entries) {
        body.insert("com_fields".to_string(), Value::Object(com_fields));
    }
}

/// Add `filter[<name>]` query entries for every truthy filter, in the given
/// order of `(form key, filter name)` pairs
pub fn apply_filters(
    query: &mut Map<String, Value>,
    filters: &Map<String, Value>,
    names: &[(&str, &str)],
) {
    for (key, filter) in names {
        if let Some(value) = filters.get(*key) {
            if is_truthy(value) {
                query.insert(format!("filter[{}]", filter), value.clone());
            }
        }
    }
}

/// Derive a machine name from a title: lowercase, runs of anything outside
/// `[a-z0-9]` become one `-`, no leading or trailing `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}
