//! Batch execution
//!
//! Runs every input item through bind and dispatch in order and wraps the
//! results into the host's output envelope.

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::params::{NodeContext, Parameters};
use super::schema;
use crate::joomla::{JoomlaClient, NodeError};
use crate::resource::dispatch::{dispatch, ResourceRequest};
use crate::resource::protocol::{parse_operation, Operation, Resource};

/// Link from an output item back to the input it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionItem {
    pub json: Value,
    pub paired_item: PairedItem,
}

impl ExecutionItem {
    fn new(json: Value, item: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item },
        }
    }
}

fn text_parameter(ctx: &dyn NodeContext, name: &str, default: &str) -> String {
    ctx.parameter(name, 0)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| default.to_string())
}

/// Resource and operation for the whole batch, read from the first item
pub fn resolve_target(ctx: &dyn NodeContext) -> Result<(Resource, Operation), NodeError> {
    let resource_default = schema::description()
        .properties
        .iter()
        .find(|p| p.name == "resource")
        .and_then(|p| p.default.as_str())
        .unwrap_or("article");
    let resource: Resource = text_parameter(ctx, "resource", resource_default).parse()?;
    let operation = parse_operation(
        resource,
        &text_parameter(ctx, "operation", resource.default_operation().as_str()),
    )?;
    Ok((resource, operation))
}

async fn run_item(
    ctx: &dyn NodeContext,
    client: &JoomlaClient,
    item_index: usize,
    resource: Resource,
    operation: Operation,
) -> Result<Value> {
    let params = Parameters::new(ctx, item_index, resource, operation);
    let request = ResourceRequest::bind(resource, operation, &params)?;
    dispatch(client, request).await
}

/// Wrap a handler result: `null` becomes `{success: true}`, arrays fan out
fn envelope(response: Value, item_index: usize) -> Vec<ExecutionItem> {
    match response {
        Value::Null => vec![ExecutionItem::new(json!({ "success": true }), item_index)],
        Value::Array(values) => values
            .into_iter()
            .map(|v| ExecutionItem::new(v, item_index))
            .collect(),
        other => vec![ExecutionItem::new(other, item_index)],
    }
}

/// Execute the node over every input item
pub async fn execute(ctx: &dyn NodeContext, client: &JoomlaClient) -> Result<Vec<ExecutionItem>> {
    let total = ctx.input_len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let (resource, operation) = resolve_target(ctx)?;
    debug!("Executing {} {} over {} items", resource, operation, total);

    let mut output = Vec::new();
    for item_index in 0..total {
        match run_item(ctx, client, item_index, resource, operation).await {
            Ok(response) => output.extend(envelope(response, item_index)),
            Err(e) if ctx.continue_on_fail() => {
                warn!("Item {} failed, continuing: {}", item_index, e);
                output.push(ExecutionItem::new(
                    json!({ "error": e.to_string() }),
                    item_index,
                ));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(output)
}
