//! Request dispatch
//!
//! One typed request per (resource, operation) pair. Binding reads the
//! parameters of a single item; dispatch routes to the resource's handler.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::handlers::article::{self, ArticleRequest};
use super::handlers::category::{self, CategoryRequest};
use super::handlers::field::{self, FieldRequest};
use super::handlers::media::{self, MediaRequest};
use super::handlers::tag::{self, TagRequest};
use super::protocol::{Operation, Resource};
use crate::joomla::JoomlaClient;
use crate::node::params::Parameters;

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRequest {
    Article(ArticleRequest),
    Category(CategoryRequest),
    Tag(TagRequest),
    Media(MediaRequest),
    Field(FieldRequest),
}

impl ResourceRequest {
    pub fn bind(resource: Resource, operation: Operation, params: &Parameters<'_>) -> Result<Self> {
        resource.check(operation)?;
        Ok(match resource {
            Resource::Article => ResourceRequest::Article(ArticleRequest::bind(operation, params)?),
            Resource::Category => {
                ResourceRequest::Category(CategoryRequest::bind(operation, params)?)
            }
            Resource::Tag => ResourceRequest::Tag(TagRequest::bind(operation, params)?),
            Resource::Media => ResourceRequest::Media(MediaRequest::bind(operation, params)?),
            Resource::Field => ResourceRequest::Field(FieldRequest::bind(operation, params)?),
        })
    }

    pub fn resource(&self) -> Resource {
        match self {
            ResourceRequest::Article(_) => Resource::Article,
            ResourceRequest::Category(_) => Resource::Category,
            ResourceRequest::Tag(_) => Resource::Tag,
            ResourceRequest::Media(_) => Resource::Media,
            ResourceRequest::Field(_) => Resource::Field,
        }
    }
}

/// Execute a bound request
pub async fn dispatch(client: &JoomlaClient, request: ResourceRequest) -> Result<Value> {
    debug!("Dispatching {} request", request.resource());
    match request {
        ResourceRequest::Article(r) => article::handle(client, r).await,
        ResourceRequest::Category(r) => category::handle(client, r).await,
        ResourceRequest::Tag(r) => tag::handle(client, r).await,
        ResourceRequest::Media(r) => media::handle(client, r).await,
        ResourceRequest::Field(r) => field::handle(client, r).await,
    }
}
