//! Per-resource request handlers
//!
//! Each resource module turns node parameters into a typed request enum
//! (`bind`) and executes it against the API (`handle`). The pieces every
//! resource shares live here.

pub mod article;
pub mod category;
pub mod field;
pub mod media;
pub mod tag;

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::debug;

use super::field_mapper::{apply_filters, parse_custom_field_entries, CustomFieldEntry};
use crate::joomla::{HttpMethod, JoomlaClient, NodeError};
use crate::node::params::Parameters;
use crate::resource::protocol::{Operation, Resource};

/// A `getAll` request: either every page, or the first `limit` records
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub return_all: bool,
    pub limit: i64,
    /// `filter[...]` entries, already reduced to truthy values
    pub query: Map<String, Value>,
}

impl Listing {
    /// Read `returnAll`, `limit` and the `filters` collection. `filters` maps
    /// form keys to Joomla filter names.
    pub fn bind(params: &Parameters<'_>, filters: &[(&str, &str)]) -> Result<Self> {
        let return_all = params.boolean("returnAll")?;
        let limit = if return_all {
            0
        } else {
            params.integer("limit")?
        };
        let mut query = Map::new();
        if !filters.is_empty() {
            apply_filters(&mut query, &params.object("filters")?, filters);
        }
        Ok(Self {
            return_all,
            limit,
            query,
        })
    }

    pub fn all() -> Self {
        Self {
            return_all: true,
            limit: 0,
            query: Map::new(),
        }
    }
}

/// Run a listing against a collection endpoint. Returns the records as an
/// array; a single page returns the response's `data` member as-is.
pub async fn fetch_listing(
    client: &JoomlaClient,
    endpoint: &str,
    listing: Listing,
) -> Result<Value> {
    if listing.return_all {
        let items = client
            .request_all_items(HttpMethod::Get, endpoint, Map::new(), listing.query)
            .await?;
        return Ok(Value::Array(items));
    }

    let mut query = listing.query;
    query.insert("page[limit]".to_string(), Value::from(listing.limit));
    let response = client
        .request(HttpMethod::Get, endpoint, Map::new(), query)
        .await?;
    let data = response.get("data").cloned().unwrap_or(Value::Null);
    debug!(
        "Fetched single page from {}: {} records",
        endpoint,
        data.as_array().map(|a| a.len()).unwrap_or(0)
    );
    Ok(data)
}

/// Rows of the `customFields` sub-form
pub fn bind_custom_fields(params: &Parameters<'_>) -> Result<Vec<CustomFieldEntry>> {
    let collection = params.object("customFields")?;
    Ok(parse_custom_field_entries(&Value::Object(collection)))
}

/// Error for an operation a resource does not offer
pub fn unsupported(resource: Resource, operation: Operation) -> anyhow::Error {
    NodeError::UnknownOperation {
        resource: resource.as_str().to_string(),
        operation: operation.as_str().to_string(),
    }
    .into()
}

/// `<endpoint>/<id>`
pub fn record_endpoint(endpoint: &str, id: i64) -> String {
    format!("{}/{}", endpoint, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page, MockContext, MockTransport};
    use serde_json::json;

    #[test]
    fn test_listing_bind_defaults() {
        let ctx = MockContext::new(vec![json!({})]);
        let params = Parameters::new(&ctx, 0, Resource::Tag, Operation::GetAll);
        let listing = Listing::bind(&params, &[("search", "search")]).unwrap();
        assert!(!listing.return_all);
        assert_eq!(listing.limit, 20);
        assert!(listing.query.is_empty());
    }

    #[tokio::test]
    async fn test_single_page_returns_data_member() {
        let mock = MockTransport::new(vec![Ok(page(vec![json!({"id": "1"})], true))]);
        let listing = Listing {
            return_all: false,
            limit: 5,
            query: Map::new(),
        };
        let data = fetch_listing(&mock.client(), "/tags", listing).await.unwrap();
        assert_eq!(data, json!([{"id": "1"}]));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_param("page[limit]"), Some(&json!(5)));
        assert_eq!(requests[0].query_param("page[offset]"), None);
    }

    #[tokio::test]
    async fn test_return_all_walks_pages() {
        let mock = MockTransport::new(vec![
            Ok(page(vec![json!({"id": "1"})], true)),
            Ok(page(vec![json!({"id": "2"})], false)),
        ]);
        let data = fetch_listing(&mock.client(), "/tags", Listing::all())
            .await
            .unwrap();
        assert_eq!(data, json!([{"id": "1"}, {"id": "2"}]));
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_record_endpoint() {
        assert_eq!(record_endpoint("/tags", 12), "/tags/12");
    }
}
