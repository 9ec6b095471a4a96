//! Error kinds surfaced by the Joomla API layer and the node

use serde_json::{json, Value};
use thiserror::Error;

/// Any failure coming back from the transport: network errors, non-2xx
/// responses and undecodable bodies all end up here, with the original
/// payload kept for callers that need to inspect it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub payload: Value,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: Option<u16>, payload: Value) -> Self {
        Self {
            message: message.into(),
            status,
            payload,
        }
    }

    /// Build from a non-success response. Joomla answers with a JSON:API
    /// `errors` array; anything else is kept as raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body)
            .unwrap_or_else(|_| Value::String(body.to_string()));
        let detail = error_detail(&payload).unwrap_or_else(|| {
            let text = body.trim();
            if text.is_empty() {
                "no response body".to_string()
            } else {
                text.chars().take(200).collect()
            }
        });
        Self::new(
            format!("Joomla request failed ({}): {}", status, detail),
            Some(status),
            payload,
        )
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        Self::new(
            format!("Joomla request failed: {}", err),
            err.status().map(|s| s.as_u16()),
            json!({ "message": err.to_string() }),
        )
    }

    pub fn decode(body: &str, err: &serde_json::Error) -> Self {
        Self::new(
            format!("Joomla returned invalid JSON: {}", err),
            None,
            Value::String(body.to_string()),
        )
    }

    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
            || self.message.contains("not found")
            || self.message.contains("Not Found")
            || self.message.contains("404")
    }

    /// Search the message and the serialized payload for a marker string
    pub fn payload_contains(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.payload.to_string().contains(needle)
    }
}

fn error_detail(payload: &Value) -> Option<String> {
    if let Some(first) = payload
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|a| a.first())
    {
        let title = first.get("title").and_then(|v| v.as_str());
        let detail = first.get("detail").and_then(|v| v.as_str());
        return match (title, detail) {
            (Some(t), Some(d)) if t != d => Some(format!("{} - {}", t, d)),
            (Some(t), _) => Some(t.to_string()),
            (None, Some(d)) => Some(d.to_string()),
            (None, None) => None,
        };
    }
    payload
        .get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Errors raised by the node itself rather than by the API
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Invalid value for parameter '{name}' (item {item_index}): {reason}")]
    Parameter {
        name: String,
        item_index: usize,
        reason: String,
    },

    #[error("The resource '{0}' is not known")]
    UnknownResource(String),

    #[error("The operation '{operation}' is not supported for resource '{resource}'")]
    UnknownOperation { resource: String, operation: String },

    #[error("Item {item_index} has no binary data in property '{property}'")]
    MissingBinary { item_index: usize, property: String },

    #[error(
        "Field {field_id} was not deleted. Make sure the field is in Trashed state (state = -2) before deleting."
    )]
    FieldNotDeleted { field_id: i64 },
}
