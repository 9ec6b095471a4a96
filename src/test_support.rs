//! In-memory host and transport for unit tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::joomla::{ApiError, ApiRequest, ApiTransport, JoomlaClient};
use crate::node::params::{BinaryData, NodeContext};

#[derive(Default)]
struct MockState {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

/// Transport answering from a queue and recording every request
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<Value, ApiError>>) -> Self {
        let mock = Self::default();
        mock.state
            .responses
            .lock()
            .unwrap()
            .extend(responses);
        mock
    }

    pub fn client(&self) -> JoomlaClient {
        JoomlaClient::new(Arc::new(self.clone()))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        self.state.requests.lock().unwrap().push(request.clone());
        self.state
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::new(
                    format!("no mock response for {}", request.endpoint),
                    None,
                    Value::Null,
                ))
            })
    }
}

/// Collection page in the JSON:API shape
pub fn page(data: Vec<Value>, has_next: bool) -> Value {
    let mut links = json!({ "self": "https://example.com/api/index.php/v1/items" });
    if has_next {
        links["next"] = json!("https://example.com/api/index.php/v1/items?page[offset]=20");
    }
    json!({ "data": data, "links": links })
}

/// Host with fixed per-item parameters
#[derive(Default)]
pub struct MockContext {
    items: Vec<Value>,
    binaries: HashMap<(usize, String), BinaryData>,
    continue_on_fail: bool,
}

impl MockContext {
    /// One parameter object per input item
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn with_binary(mut self, item_index: usize, property: &str, binary: BinaryData) -> Self {
        self.binaries.insert((item_index, property.to_string()), binary);
        self
    }

    pub fn continuing_on_fail(mut self) -> Self {
        self.continue_on_fail = true;
        self
    }
}

impl NodeContext for MockContext {
    fn input_len(&self) -> usize {
        self.items.len()
    }

    fn parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.items.get(item_index)?.get(name).cloned()
    }

    fn binary(&self, item_index: usize, property: &str) -> Option<BinaryData> {
        self.binaries
            .get(&(item_index, property.to_string()))
            .cloned()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
