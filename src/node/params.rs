//! Host parameter access
//!
//! The host resolves parameter expressions per input item. [`Parameters`]
//! reads them for one item with typed getters, falling back to the schema
//! default when the host leaves a parameter unset.

use serde_json::{Map, Value};

use super::schema;
use crate::joomla::NodeError;
use crate::resource::path_extractor::value_to_string;
use crate::resource::protocol::{Operation, Resource};

/// Binary payload attached to an input item
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryData {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// What the node needs from the workflow host
pub trait NodeContext: Send + Sync {
    /// Number of input items in the batch
    fn input_len(&self) -> usize;

    /// Resolved value of a parameter for one item, `None` when unset
    fn parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Binary property of an input item
    fn binary(&self, item_index: usize, property: &str) -> Option<BinaryData>;

    fn continue_on_fail(&self) -> bool;
}

/// Parameters of a single item, for a resolved resource/operation
pub struct Parameters<'a> {
    ctx: &'a dyn NodeContext,
    item_index: usize,
    resource: Resource,
    operation: Operation,
}

impl<'a> Parameters<'a> {
    pub fn new(
        ctx: &'a dyn NodeContext,
        item_index: usize,
        resource: Resource,
        operation: Operation,
    ) -> Self {
        Self {
            ctx,
            item_index,
            resource,
            operation,
        }
    }

    pub fn item_index(&self) -> usize {
        self.item_index
    }

    fn invalid(&self, name: &str, reason: impl Into<String>) -> NodeError {
        NodeError::Parameter {
            name: name.to_string(),
            item_index: self.item_index,
            reason: reason.into(),
        }
    }

    /// Raw value: host value, else schema default, else `null`
    pub fn value(&self, name: &str) -> Value {
        self.ctx
            .parameter(name, self.item_index)
            .filter(|v| !v.is_null())
            .or_else(|| {
                schema::description().default_value(name, self.resource, self.operation)
            })
            .unwrap_or(Value::Null)
    }

    pub fn string(&self, name: &str) -> Result<String, NodeError> {
        match self.value(name) {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.invalid(name, format!("expected a string, got {}", other))),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64, NodeError> {
        let value = self.value(name);
        as_integer(&value).ok_or_else(|| {
            self.invalid(name, format!("expected an integer, got {}", value))
        })
    }

    pub fn boolean(&self, name: &str) -> Result<bool, NodeError> {
        match self.value(name) {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            other => Err(self.invalid(name, format!("expected a boolean, got {}", other))),
        }
    }

    /// Collection parameter; unset collections are empty
    pub fn object(&self, name: &str) -> Result<Map<String, Value>, NodeError> {
        match self.value(name) {
            Value::Null => Ok(Map::new()),
            Value::Object(map) => Ok(map),
            other => Err(self.invalid(name, format!("expected an object, got {}", other))),
        }
    }

    pub fn string_list(&self, name: &str) -> Result<Vec<String>, NodeError> {
        match self.value(name) {
            Value::Null => Ok(Vec::new()),
            Value::Array(values) => Ok(values.iter().map(|v| value_to_string(v, "")).collect()),
            other => Err(self.invalid(name, format!("expected a list, got {}", other))),
        }
    }

    pub fn binary(&self, property: &str) -> Result<BinaryData, NodeError> {
        self.ctx
            .binary(self.item_index, property)
            .ok_or_else(|| NodeError::MissingBinary {
                item_index: self.item_index,
                property: property.to_string(),
            })
    }
}

/// Integer from a JSON number or a numeric string
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String member of a collection, `None` when absent or empty
pub fn member_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub fn member_bool(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    fields.get(key).and_then(Value::as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockContext;
    use serde_json::json;

    #[test]
    fn test_host_value_wins_over_default() {
        let ctx = MockContext::new(vec![json!({"limit": 5})]);
        let params = Parameters::new(&ctx, 0, Resource::Article, Operation::GetAll);
        assert_eq!(params.integer("limit").unwrap(), 5);
    }

    #[test]
    fn test_falls_back_to_schema_default() {
        let ctx = MockContext::new(vec![json!({})]);
        let params = Parameters::new(&ctx, 0, Resource::Media, Operation::Upload);
        assert_eq!(params.string("binaryPropertyName").unwrap(), "data");
        assert_eq!(params.string("destinationFolder").unwrap(), "images");
        assert!(params.object("options").unwrap().is_empty());
        assert!(!params.boolean("returnAll").unwrap());
    }

    #[test]
    fn test_null_host_value_uses_default() {
        let ctx = MockContext::new(vec![json!({"limit": null})]);
        let params = Parameters::new(&ctx, 0, Resource::Tag, Operation::GetAll);
        assert_eq!(params.integer("limit").unwrap(), 20);
    }

    #[test]
    fn test_type_mismatch_names_parameter_and_item() {
        let ctx = MockContext::new(vec![json!({}), json!({"articleId": "abc"})]);
        let params = Parameters::new(&ctx, 1, Resource::Article, Operation::Get);
        let err = params.integer("articleId").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for parameter 'articleId' (item 1): expected an integer, got \"abc\""
        );
    }

    #[test]
    fn test_numeric_strings_are_integers() {
        assert_eq!(as_integer(&json!("42")), Some(42));
        assert_eq!(as_integer(&json!(7.0)), Some(7));
        assert_eq!(as_integer(&json!(7.5)), None);
        assert_eq!(as_integer(&json!(true)), None);
    }

    #[test]
    fn test_string_list() {
        let ctx = MockContext::new(vec![json!({"urlSchemes": ["http", "ftp"]})]);
        let params = Parameters::new(&ctx, 0, Resource::Field, Operation::Create);
        assert_eq!(params.string_list("urlSchemes").unwrap(), vec!["http", "ftp"]);
    }

    #[test]
    fn test_missing_binary() {
        let ctx = MockContext::new(vec![json!({})]);
        let params = Parameters::new(&ctx, 0, Resource::Media, Operation::Upload);
        assert!(matches!(
            params.binary("data"),
            Err(NodeError::MissingBinary { item_index: 0, .. })
        ));
    }

    #[test]
    fn test_member_helpers() {
        let fields = json!({"alias": "", "fileName": "a.png", "ignoreIfExists": false});
        let fields = fields.as_object().unwrap();
        assert_eq!(member_string(fields, "alias"), None);
        assert_eq!(member_string(fields, "fileName").as_deref(), Some("a.png"));
        assert_eq!(member_bool(fields, "ignoreIfExists"), Some(false));
    }
}
