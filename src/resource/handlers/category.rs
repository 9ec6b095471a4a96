//! Content categories (`/content/categories`)

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::debug;

use super::{bind_custom_fields, fetch_listing, record_endpoint, unsupported, Listing};
use crate::joomla::{HttpMethod, JoomlaClient};
use crate::node::params::Parameters;
use crate::resource::field_mapper::{apply_custom_fields, copy_fields, CustomFieldEntry};
use crate::resource::path_extractor::{is_truthy, record_attribute};
use crate::resource::protocol::{Operation, Resource, CATEGORIES_ENDPOINT};

const FILTERS: &[(&str, &str)] = &[("search", "search"), ("extension", "extension")];

const JSON_FIELDS: &[&str] = &["associations"];

/// Component new categories are created under
const CONTENT_EXTENSION: &str = "com_content";

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryRequest {
    Create {
        title: String,
        fields: Map<String, Value>,
        custom_fields: Vec<CustomFieldEntry>,
    },
    Get {
        id: i64,
    },
    GetAll(Listing),
    Update {
        id: i64,
        fields: Map<String, Value>,
        custom_fields: Vec<CustomFieldEntry>,
    },
    Delete {
        id: i64,
    },
}

impl CategoryRequest {
    pub fn bind(operation: Operation, params: &Parameters<'_>) -> Result<Self> {
        Ok(match operation {
            Operation::Create => CategoryRequest::Create {
                title: params.string("title")?,
                fields: params.object("additionalFields")?,
                custom_fields: bind_custom_fields(params)?,
            },
            Operation::Get => CategoryRequest::Get {
                id: params.integer("categoryId")?,
            },
            Operation::GetAll => CategoryRequest::GetAll(Listing::bind(params, FILTERS)?),
            Operation::Update => CategoryRequest::Update {
                id: params.integer("categoryId")?,
                fields: params.object("updateFields")?,
                custom_fields: bind_custom_fields(params)?,
            },
            Operation::Delete => CategoryRequest::Delete {
                id: params.integer("categoryId")?,
            },
            other => return Err(unsupported(Resource::Category, other)),
        })
    }
}

/// Joomla links a category to itself when saving associations, so its own
/// language must be in the body and must not be an association key.
async fn normalize_associations(
    client: &JoomlaClient,
    id: i64,
    body: &mut Map<String, Value>,
) -> Result<()> {
    if !matches!(body.get("associations"), Some(Value::Object(_))) {
        return Ok(());
    }

    if !body.get("language").map(is_truthy).unwrap_or(false) {
        let current = client.get(&record_endpoint(CATEGORIES_ENDPOINT, id)).await?;
        let language = record_attribute(&current, "language");
        if is_truthy(&language) {
            debug!("Using stored language {} of category {}", language, id);
            body.insert("language".to_string(), language);
        }
    }

    let own_language = body
        .get("language")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let (Some(language), Some(Value::Object(associations))) =
        (own_language, body.get_mut("associations"))
    {
        associations.remove(&language);
    }
    Ok(())
}

pub async fn handle(client: &JoomlaClient, request: CategoryRequest) -> Result<Value> {
    let response = match request {
        CategoryRequest::Create {
            title,
            fields,
            custom_fields,
        } => {
            let mut body = Map::new();
            body.insert("title".to_string(), Value::from(title));
            body.insert("extension".to_string(), Value::from(CONTENT_EXTENSION));
            copy_fields(&mut body, &fields, JSON_FIELDS);
            apply_custom_fields(&mut body, &custom_fields);
            client
                .request(HttpMethod::Post, CATEGORIES_ENDPOINT, body, Map::new())
                .await?
        }
        CategoryRequest::Get { id } => {
            client.get(&record_endpoint(CATEGORIES_ENDPOINT, id)).await?
        }
        CategoryRequest::GetAll(listing) => {
            fetch_listing(client, CATEGORIES_ENDPOINT, listing).await?
        }
        CategoryRequest::Update {
            id,
            fields,
            custom_fields,
        } => {
            let mut body = Map::new();
            copy_fields(&mut body, &fields, JSON_FIELDS);
            normalize_associations(client, id, &mut body).await?;
            apply_custom_fields(&mut body, &custom_fields);
            client
                .request(
                    HttpMethod::Patch,
                    &record_endpoint(CATEGORIES_ENDPOINT, id),
                    body,
                    Map::new(),
                )
                .await?
        }
        CategoryRequest::Delete { id } => {
            client
                .request(
                    HttpMethod::Delete,
                    &record_endpoint(CATEGORIES_ENDPOINT, id),
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

    fn bind(operation: Operation, item: Value) -> CategoryRequest {
        let ctx = MockContext::new(vec![item]);
        let params = Parameters::new(&ctx, 0, Resource::Category, operation);
        CategoryRequest::bind(operation, &params).unwrap()
    }

    #[tokio::test]
    async fn test_create_forces_content_extension() {
        let request = bind(
            Operation::Create,
            json!({
                "title": "News",
                "additionalFields": {"parent_id": "3", "published": 1, "description": ""}
            }),
        );
        let mock = MockTransport::new(vec![Ok(json!({"data": {"id": "9"}}))]);
        handle(&mock.client(), request).await.unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.endpoint, "/content/categories");
        assert_eq!(
            Value::Object(req.body.clone().unwrap()),
            json!({"title": "News", "extension": "com_content", "parent_id": "3", "published": 1})
        );
    }

    #[tokio::test]
    async fn test_update_associations_fetches_language() {
        let request = bind(
            Operation::Update,
            json!({
                "categoryId": 9,
                "updateFields": {"associations": "{\"en-GB\": 9, \"fr-FR\": 14}"}
            }),
        );
        let mock = MockTransport::new(vec![
            Ok(json!({"data": {"id": "9", "attributes": {"language": "en-GB"}}})),
            Ok(json!({"data": {"id": "9"}})),
        ]);
        handle(&mock.client(), request).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].endpoint, "/content/categories/9");
        assert_eq!(requests[1].method, HttpMethod::Patch);
        assert_eq!(
            Value::Object(requests[1].body.clone().unwrap()),
            json!({"associations": {"fr-FR": 14}, "language": "en-GB"})
        );
    }

    #[tokio::test]
    async fn test_update_associations_with_explicit_language_skips_fetch() {
        let request = bind(
            Operation::Update,
            json!({
                "categoryId": 9,
                "updateFields": {
                    "language": "fr-FR",
                    "associations": "{\"fr-FR\": 9, \"en-GB\": 2}"
                }
            }),
        );
        let mock = MockTransport::new(vec![Ok(json!({"data": {}}))]);
        handle(&mock.client(), request).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            Value::Object(requests[0].body.clone().unwrap()),
            json!({"associations": {"en-GB": 2}, "language": "fr-FR"})
        );
    }

    #[tokio::test]
    async fn test_update_with_raw_associations_string_is_untouched() {
        let request = bind(
            Operation::Update,
            json!({"categoryId": 9, "updateFields": {"associations": "not json"}}),
        );
        let mock = MockTransport::new(vec![Ok(json!({"data": {}}))]);
        handle(&mock.client(), request).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body.as_ref().unwrap()["associations"], "not json");
    }

    #[tokio::test]
    async fn test_get_all_filters() {
        let request = bind(
            Operation::GetAll,
            json!({"returnAll": true, "filters": {"extension": "com_content", "search": ""}}),
        );
        let mock = MockTransport::new(vec![Ok(json!({"data": []}))]);
        handle(&mock.client(), request).await.unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.query_param("filter[extension]"), Some(&json!("com_content")));
        assert_eq!(req.query_param("filter[search]"), None);
        assert_eq!(req.query_param("page[limit]"), Some(&json!(20)));
    }
}
