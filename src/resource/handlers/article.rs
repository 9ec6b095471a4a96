//! Articles (`/content/articles`)

use anyhow::Result;
use serde_json::{Map, Value};

use super::{bind_custom_fields, fetch_listing, record_endpoint, unsupported, Listing};
use crate::joomla::{HttpMethod, JoomlaClient};
use crate::node::params::Parameters;
use crate::resource::field_mapper::{apply_custom_fields, copy_fields, CustomFieldEntry};
use crate::resource::protocol::{Operation, Resource, ARTICLES_ENDPOINT};

const FILTERS: &[(&str, &str)] = &[
    ("catid", "category_id"),
    ("state", "state"),
    ("language", "language"),
    ("featured", "featured"),
    ("search", "search"),
];

const CREATE_JSON_FIELDS: &[&str] = &["images"];
const UPDATE_JSON_FIELDS: &[&str] = &["associations", "images"];

#[derive(Debug, Clone, PartialEq)]
pub enum ArticleRequest {
    Create {
        title: String,
        catid: i64,
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

impl ArticleRequest {
    pub fn bind(operation: Operation, params: &Parameters<'_>) -> Result<Self> {
        Ok(match operation {
            Operation::Create => ArticleRequest::Create {
                title: params.string("title")?,
                catid: params.integer("catid")?,
                fields: params.object("additionalFields")?,
                custom_fields: bind_custom_fields(params)?,
            },
            Operation::Get => ArticleRequest::Get {
                id: params.integer("articleId")?,
            },
            Operation::GetAll => ArticleRequest::GetAll(Listing::bind(params, FILTERS)?),
            Operation::Update => ArticleRequest::Update {
                id: params.integer("articleId")?,
                fields: params.object("updateFields")?,
                custom_fields: bind_custom_fields(params)?,
            },
            Operation::Delete => ArticleRequest::Delete {
                id: params.integer("articleId")?,
            },
            other => return Err(unsupported(Resource::Article, other)),
        })
    }
}

pub async fn handle(client: &JoomlaClient, request: ArticleRequest) -> Result<Value> {
    let response = match request {
        ArticleRequest::Create {
            title,
            catid,
            fields,
            custom_fields,
        } => {
            let mut body = Map::new();
            body.insert("title".to_string(), Value::from(title));
            body.insert("catid".to_string(), Value::from(catid));
            copy_fields(&mut body, &fields, CREATE_JSON_FIELDS);
            apply_custom_fields(&mut body, &custom_fields);
            client
                .request(HttpMethod::Post, ARTICLES_ENDPOINT, body, Map::new())
                .await?
        }
        ArticleRequest::Get { id } => client.get(&record_endpoint(ARTICLES_ENDPOINT, id)).await?,
        ArticleRequest::GetAll(listing) => fetch_listing(client, ARTICLES_ENDPOINT, listing).await?,
        ArticleRequest::Update {
            id,
            fields,
            custom_fields,
        } => {
            let mut body = Map::new();
            copy_fields(&mut body, &fields, UPDATE_JSON_FIELDS);
            apply_custom_fields(&mut body, &custom_fields);
            client
                .request(
                    HttpMethod::Patch,
                    &record_endpoint(ARTICLES_ENDPOINT, id),
                    body,
                    Map::new(),
                )
                .await?
        }
        ArticleRequest::Delete { id } => {
            client
                .request(
                    HttpMethod::Delete,
                    &record_endpoint(ARTICLES_ENDPOINT, id),
                    Map::new(),
                    Map::new(),
                )
                .await?
        }
    };
    Ok(response)
}
