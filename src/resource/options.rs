//! Dropdown option loaders
//!
//! Project Joomla collections into name/value pairs for the host UI.
//! Categories and tags fail loudly; languages and custom fields fall back to
//! a fixed list, since those APIs may be missing on a site.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::path_extractor::{extract_by_path, extract_string};
use super::protocol::{
    ARTICLE_FIELDS_ENDPOINT, CATEGORIES_ENDPOINT, CATEGORY_FIELDS_ENDPOINT, LANGUAGES_ENDPOINT,
    TAGS_ENDPOINT,
};
use crate::joomla::{ApiError, HttpMethod, JoomlaClient};
use crate::node::schema::PropertyOption;

/// Loaders the schema can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadOptionsMethod {
    GetCategories,
    GetTags,
    GetLanguages,
    GetArticleCustomFields,
    GetCategoryCustomFields,
}

impl LoadOptionsMethod {
    pub const ALL: [LoadOptionsMethod; 5] = [
        LoadOptionsMethod::GetCategories,
        LoadOptionsMethod::GetTags,
        LoadOptionsMethod::GetLanguages,
        LoadOptionsMethod::GetArticleCustomFields,
        LoadOptionsMethod::GetCategoryCustomFields,
    ];
}

async fn fetch_all(client: &JoomlaClient, endpoint: &str) -> Result<Vec<Value>, ApiError> {
    client
        .request_all_items(HttpMethod::Get, endpoint, Map::new(), Map::new())
        .await
}

/// `attributes.title` → `id`
fn title_options(records: &[Value]) -> Vec<PropertyOption> {
    records
        .iter()
        .map(|record| {
            PropertyOption::new(
                extract_string(record, "/attributes/title", ""),
                extract_by_path(record, "/id"),
            )
        })
        .collect()
}

pub async fn get_categories(client: &JoomlaClient) -> Result<Vec<PropertyOption>> {
    let records = fetch_all(client, CATEGORIES_ENDPOINT).await?;
    Ok(title_options(&records))
}

pub async fn get_tags(client: &JoomlaClient) -> Result<Vec<PropertyOption>> {
    let records = fetch_all(client, TAGS_ENDPOINT).await?;
    Ok(title_options(&records))
}

async fn fetch_languages(client: &JoomlaClient) -> Result<Vec<PropertyOption>, ApiError> {
    let records = fetch_all(client, LANGUAGES_ENDPOINT).await?;
    Ok(records
        .iter()
        .map(|record| {
            PropertyOption::new(
                extract_string(record, "/attributes/title", ""),
                extract_by_path(record, "/attributes/lang_code"),
            )
        })
        .collect())
}

/// Content languages; `All (*)` when the languages API is unavailable
pub async fn get_languages(client: &JoomlaClient) -> Vec<PropertyOption> {
    match fetch_languages(client).await {
        Ok(options) => options,
        Err(e) => {
            warn!("Languages unavailable, offering only '*': {}", e);
            vec![PropertyOption::new("All", "*")]
        }
    }
}

async fn fetch_custom_fields(
    client: &JoomlaClient,
    endpoint: &str,
) -> Result<Vec<PropertyOption>, ApiError> {
    let records = fetch_all(client, endpoint).await?;
    Ok(records
        .iter()
        .map(|record| {
            let name = extract_string(record, "/attributes/name", "");
            let title = extract_string(record, "/attributes/title", "");
            let kind = extract_string(record, "/attributes/type", "");
            PropertyOption::new(format!("{} ({})", title, name), name)
                .describe(format!("Type: {}", kind))
        })
        .collect())
}

async fn custom_fields_or_empty(client: &JoomlaClient, endpoint: &str) -> Vec<PropertyOption> {
    match fetch_custom_fields(client, endpoint).await {
        Ok(options) => options,
        Err(e) => {
            warn!("Custom fields unavailable at {}: {}", endpoint, e);
            Vec::new()
        }
    }
}

pub async fn get_article_custom_fields(client: &JoomlaClient) -> Vec<PropertyOption> {
    custom_fields_or_empty(client, ARTICLE_FIELDS_ENDPOINT).await
}

pub async fn get_category_custom_fields(client: &JoomlaClient) -> Vec<PropertyOption> {
    custom_fields_or_empty(client, CATEGORY_FIELDS_ENDPOINT).await
}

/// Run the named loader
pub async fn load_options(
    method: LoadOptionsMethod,
    client: &JoomlaClient,
) -> Result<Vec<PropertyOption>> {
    debug!("Loading options: {:?}", method);
    Ok(match method {
        LoadOptionsMethod::GetCategories => get_categories(client).await?,
        LoadOptionsMethod::GetTags => get_tags(client).await?,
        LoadOptionsMethod::GetLanguages => get_languages(client).await,
        LoadOptionsMethod::GetArticleCustomFields => get_article_custom_fields(client).await,
        LoadOptionsMethod::GetCategoryCustomFields => get_category_custom_fields(client).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page, MockTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_categories_project_title_and_id() {
        let mock = MockTransport::new(vec![Ok(page(
            vec![
                json!({"id": "2", "attributes": {"title": "Uncategorised"}}),
                json!({"id": "8", "attributes": {"title": "News"}}),
            ],
            false,
        ))]);
        let options = get_categories(&mock.client()).await.unwrap();
        assert_eq!(
            options,
            vec![
                PropertyOption::new("Uncategorised", "2"),
                PropertyOption::new("News", "8"),
            ]
        );
        assert_eq!(mock.requests()[0].endpoint, "/content/categories");
    }

    #[tokio::test]
    async fn test_tags_errors_propagate() {
        let mock = MockTransport::new(vec![Err(ApiError::from_response(401, "Unauthorized"))]);
        assert!(get_tags(&mock.client()).await.is_err());
    }

    #[tokio::test]
    async fn test_languages_use_lang_code() {
        let mock = MockTransport::new(vec![Ok(page(
            vec![json!({
                "id": "1",
                "attributes": {"title": "English (en-GB)", "lang_code": "en-GB"}
            })],
            false,
        ))]);
        assert_eq!(
            get_languages(&mock.client()).await,
            vec![PropertyOption::new("English (en-GB)", "en-GB")]
        );
    }

    #[tokio::test]
    async fn test_languages_fall_back_to_all() {
        let mock = MockTransport::new(vec![Err(ApiError::from_response(404, "Not Found"))]);
        assert_eq!(
            get_languages(&mock.client()).await,
            vec![PropertyOption::new("All", "*")]
        );
    }

    #[tokio::test]
    async fn test_article_custom_fields_projection() {
        let mock = MockTransport::new(vec![Ok(page(
            vec![json!({
                "id": "4",
                "attributes": {"title": "Subtitle", "name": "subtitle", "type": "text"}
            })],
            false,
        ))]);
        let options = get_article_custom_fields(&mock.client()).await;
        assert_eq!(
            options,
            vec![PropertyOption::new("Subtitle (subtitle)", "subtitle").describe("Type: text")]
        );
        assert_eq!(mock.requests()[0].endpoint, "/fields/content/articles");
    }

    #[tokio::test]
    async fn test_custom_fields_fall_back_to_empty() {
        let mock = MockTransport::new(vec![Err(ApiError::from_response(500, "boom"))]);
        assert!(get_category_custom_fields(&mock.client()).await.is_empty());
        assert_eq!(mock.requests()[0].endpoint, "/fields/content/categories");
    }

    #[tokio::test]
    async fn test_load_options_dispatches() {
        let mock = MockTransport::new(vec![Ok(page(vec![], false))]);
        let options = load_options(LoadOptionsMethod::GetTags, &mock.client())
            .await
            .unwrap();
        assert!(options.is_empty());
        assert_eq!(mock.requests()[0].endpoint, "/tags");
    }

    #[test]
    fn test_method_names_serialize_like_schema() {
        assert_eq!(
            serde_json::to_value(LoadOptionsMethod::GetArticleCustomFields).unwrap(),
            json!("getArticleCustomFields")
        );
    }
}
