//! Tags (`/tags`)

use anyhow::Result;
use serde_json::{Map, Value};

use super::{fetch_listing, record_endpoint, unsupported, Listing};
use crate::joomla::{HttpMethod, JoomlaClient};
use crate::node::params::Parameters;
use crate::resource::field_mapper::copy_allowed_fields;
use crate::resource::path_extractor::is_truthy;
use crate::resource::protocol::{Operation, Resource, TAGS_ENDPOINT};

const FILTERS: &[(&str, &str)] = &[
    ("parent_id", "parent_id"),
    ("state", "state"),
    ("language", "language"),
    ("search", "search"),
];

/// Members accepted from the additional fields collection
const CREATE_FIELDS: &[&str] = &["alias", "description", "language", "published"];
const UPDATE_FIELDS: &[&str] = &[
    "alias",
    "description",
    "language",
    "published",
    "title",
    "parent_id",
];

/// Id of the root tag
const ROOT_TAG_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum TagRequest {
    Create {
        title: String,
        fields: Map<String, Value>,
    },
    Get {
        id: i64,
    },
    GetAll(Listing),
    Update {
        id: i64,
        fields: Map<String, Value>,
    },
    Delete {
        id: i64,
    },
}

impl TagRequest {
    pub fn bind(operation: Operation, params: &Parameters<'_>) -> Result<Self> {
        Ok(match operation {
            Operation::Create => TagRequest::Create {
                title: params.string("title")?,
                fields: params.object("additionalFields")?,
            },
            Operation::Get => TagRequest::Get {
                id: params.integer("tagId")?,
            },
            Operation::GetAll => TagRequest::GetAll(Listing::bind(params, FILTERS)?),
            Operation::Update => TagRequest::Update {
                id: params.integer("tagId")?,
                fields: params.object("updateFields")?,
            },
            Operation::Delete => TagRequest::Delete {
                id: params.integer("tagId")?,
            },
            other => return Err(unsupported(Resource::Tag, other)),
        })
    }
}

/// Create body: a falsy `parent_id` places the tag under the root
fn create_body(title: String, fields: &Map<String, Value>) -> Map<String, Value> {
    let parent_id = fields
        .get("parent_id")
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| Value::from(ROOT_TAG_ID));

    let mut body = Map::new();
    body.insert("title".to_string(), Value::from(title));
    body.insert("parent_id".to_string(), parent_id);
    copy_allowed_fields(&mut body, fields, CREATE_FIELDS);
    body
}

pub async fn handle(client: &JoomlaClient, request: TagRequest) -> Result<Value> {
    let response = match request {
        TagRequest::Create { title, fields } => {
            let body = create_body(title, &fields);
            client
                .request(HttpMethod::Post, TAGS_ENDPOINT, body, Map::new())
                .await?
        }
        TagRequest::Get { id } => client.get(&record_endpoint(TAGS_ENDPOINT, id)).await?,
        TagRequest::GetAll(listing) => fetch_listing(client, TAGS_ENDPOINT, listing).await?,
        TagRequest::Update { id, fields } => {
            let mut body = Map::new();
            copy_allowed_fields(&mut body, &fields, UPDATE_FIELDS);
            client
                .request(
                    HttpMethod::Patch,
                    &record_endpoint(TAGS_ENDPOINT, id),
                    body,
                    Map::new(),
                )
                .await?
        }
        TagRequest::Delete { id } => {
            client
                .request(
                    HttpMethod::Delete,
                    &record_endpoint(TAGS_ENDPOINT, id),
                    Map::new(),
                    Map::new(),
                )
                .await?
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockContext, MockTransport};
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_create_defaults_parent_to_root() {
        let body = create_body("Rust".to_string(), &Map::new());
        assert_eq!(Value::Object(body), json!({"title": "Rust", "parent_id": 1}));

        for falsy in [json!(""), json!(0), Value::Null] {
            let body = create_body("Rust".to_string(), &fields(json!({ "parent_id": falsy })));
            assert_eq!(body["parent_id"], json!(1));
        }
    }

    #[test]
    fn test_create_keeps_parent_and_whitelisted_fields() {
        let body = create_body(
            "Rust".to_string(),
            &fields(json!({
                "parent_id": "7",
                "alias": "rust",
                "language": "*",
                "note": "dropped",
                "description": ""
            })),
        );
        assert_eq!(
            Value::Object(body),
            json!({"title": "Rust", "parent_id": "7", "alias": "rust", "language": "*"})
        );
    }

    #[tokio::test]
    async fn test_update_whitelists_fields_without_parent_default() {
        let ctx = MockContext::new(vec![json!({
            "tagId": 5,
            "updateFields": {"title": "Renamed", "published": 0, "hits": 100}
        })]);
        let params = Parameters::new(&ctx, 0, Resource::Tag, Operation::Update);
        let request = TagRequest::bind(Operation::Update, &params).unwrap();

        let mock = MockTransport::new(vec![Ok(json!({"data": {}}))]);
        handle(&mock.client(), request).await.unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.endpoint, "/tags/5");
        assert_eq!(
            Value::Object(req.body.clone().unwrap()),
            json!({"title": "Renamed", "published": 0})
        );
    }

    #[tokio::test]
    async fn test_get_all_parent_filter() {
        let ctx = MockContext::new(vec![json!({
            "limit": 10,
            "filters": {"parent_id": "1", "state": "1"}
        })]);
        let params = Parameters::new(&ctx, 0, Resource::Tag, Operation::GetAll);
        let request = TagRequest::bind(Operation::GetAll, &params).unwrap();

        let mock = MockTransport::new(vec![Ok(json!({"data": []}))]);
        let data = handle(&mock.client(), request).await.unwrap();
        assert_eq!(data, json!([]));

        let req = &mock.requests()[0];
        assert_eq!(req.query_param("filter[parent_id]"), Some(&json!("1")));
        assert_eq!(req.query_param("filter[state]"), Some(&json!("1")));
        assert_eq!(req.query_param("page[limit]"), Some(&json!(10)));
    }
}
