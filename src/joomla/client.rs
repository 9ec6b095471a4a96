//! Joomla API client
//!
//! Wraps a transport with the two request shapes every handler uses: a single
//! call and a paginated walk over a collection.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace};

use super::credentials::JoomlaCredentials;
use super::error::ApiError;
use super::http::{ApiRequest, ApiTransport, HttpMethod, JoomlaHttpClient, RequestOptions};
use crate::resource::path_extractor::{extract_by_path, is_truthy};

/// Records per page when walking a collection
pub const PAGE_LIMIT: u64 = 20;

/// Shared, cheaply cloneable API client
#[derive(Clone)]
pub struct JoomlaClient {
    transport: Arc<dyn ApiTransport>,
}

impl JoomlaClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Client backed by the reqwest transport
    pub fn from_credentials(credentials: JoomlaCredentials) -> Result<Self, ApiError> {
        let http = JoomlaHttpClient::new(credentials)?;
        Ok(Self::new(Arc::new(http)))
    }

    /// Make a single request
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Map<String, Value>,
        query: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.request_with_options(method, endpoint, body, query, RequestOptions::default())
            .await
    }

    pub async fn request_with_options(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Map<String, Value>,
        query: Map<String, Value>,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::new(method, endpoint, body, query).with_options(options);
        debug!(
            "Joomla request: method={}, endpoint={}",
            method.as_str(),
            endpoint
        );
        trace!("Joomla query: {:?}", request.query);
        self.transport.send(&request).await
    }

    /// Shorthand for a bodyless GET
    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(HttpMethod::Get, endpoint, Map::new(), Map::new())
            .await
    }

    /// Fetch every record of a collection, following `links.next`
    pub async fn request_all_items(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Map<String, Value>,
        mut query: Map<String, Value>,
    ) -> Result<Vec<Value>, ApiError> {
        let mut items: Vec<Value> = Vec::new();
        let mut offset: u64 = 0;
        query.insert("page[limit]".to_string(), Value::from(PAGE_LIMIT));

        loop {
            query.insert("page[offset]".to_string(), Value::from(offset));
            let response = self
                .request(method, endpoint, body.clone(), query.clone())
                .await?;

            if let Some(data) = response.get("data").and_then(|d| d.as_array()) {
                items.extend(data.iter().cloned());
            }
            debug!(
                "Fetched page at offset {} from {}, {} items so far",
                offset,
                endpoint,
                items.len()
            );

            offset += PAGE_LIMIT;
            if !is_truthy(&extract_by_path(&response, "/links/next")) {
                break;
            }
        }

        Ok(items)
    }

    /// Cheapest authenticated call, used to check a set of credentials
    pub async fn test_credentials(&self) -> Result<(), ApiError> {
        let mut query = Map::new();
        query.insert("page[limit]".to_string(), Value::from(1));
        self.request(HttpMethod::Get, "/content/articles", Map::new(), query)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_request_all_items_concatenates_pages() {
        let first: Vec<Value> = (0..20).map(|i| json!({ "id": i })).collect();
        let second: Vec<Value> = (20..40).map(|i| json!({ "id": i })).collect();
        let third: Vec<Value> = (40..45).map(|i| json!({ "id": i })).collect();

        let mock = MockTransport::new(vec![
            Ok(page(first.clone(), true)),
            Ok(page(second.clone(), true)),
            Ok(page(third.clone(), false)),
        ]);
        let client = mock.client();

        let items = client
            .request_all_items(HttpMethod::Get, "/tags", Map::new(), Map::new())
            .await
            .unwrap();

        let expected: Vec<Value> = first.into_iter().chain(second).chain(third).collect();
        assert_eq!(items, expected);

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        for (i, req) in requests.iter().enumerate() {
            assert_eq!(req.query_param("page[limit]"), Some(&json!(20)));
            assert_eq!(req.query_param("page[offset]"), Some(&json!(i as u64 * 20)));
        }
    }

    #[tokio::test]
    async fn test_request_all_items_exact_multiple_of_page_size() {
        let pages: Vec<Vec<Value>> = (0..3)
            .map(|p| (0..20).map(|i| json!({ "id": p * 20 + i })).collect())
            .collect();
        let mock = MockTransport::new(vec![
            Ok(page(pages[0].clone(), true)),
            Ok(page(pages[1].clone(), true)),
            Ok(page(pages[2].clone(), false)),
        ]);

        let items = mock
            .client()
            .request_all_items(HttpMethod::Get, "/tags", Map::new(), Map::new())
            .await
            .unwrap();
        assert_eq!(items.len(), 60);
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_request_all_items_stops_without_links() {
        let mock = MockTransport::new(vec![Ok(json!({ "data": [{"id": 1}] }))]);
        let items = mock
            .client()
            .request_all_items(HttpMethod::Get, "/tags", Map::new(), Map::new())
            .await
            .unwrap();
        assert_eq!(items, vec![json!({"id": 1})]);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_request_all_items_keeps_base_query() {
        let mock = MockTransport::new(vec![Ok(page(vec![], false))]);
        let mut query = Map::new();
        query.insert("filter[search]".to_string(), json!("news"));

        mock.client()
            .request_all_items(HttpMethod::Get, "/content/articles", Map::new(), query)
            .await
            .unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.query_param("filter[search]"), Some(&json!("news")));
        assert_eq!(req.query_param("page[offset]"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_request_all_items_propagates_errors() {
        let mock = MockTransport::new(vec![
            Ok(page(vec![json!({"id": 1})], true)),
            Err(ApiError::from_response(500, "boom")),
        ]);
        let err = mock
            .client()
            .request_all_items(HttpMethod::Get, "/tags", Map::new(), Map::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(500));
    }

    #[tokio::test]
    async fn test_test_credentials_requests_single_article() {
        let mock = MockTransport::new(vec![Ok(page(vec![], false))]);
        mock.client().test_credentials().await.unwrap();
        let req = &mock.requests()[0];
        assert_eq!(req.endpoint, "/content/articles");
        assert_eq!(req.query_param("page[limit]"), Some(&json!(1)));
    }
}
