//! Resource and operation definitions
//!
//! Names match the values the host stores in the `resource` and `operation`
//! parameters, so they round-trip through serde unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::joomla::NodeError;

pub const ARTICLES_ENDPOINT: &str = "/content/articles";
pub const CATEGORIES_ENDPOINT: &str = "/content/categories";
pub const TAGS_ENDPOINT: &str = "/tags";
pub const ARTICLE_FIELDS_ENDPOINT: &str = "/fields/content/articles";
pub const CATEGORY_FIELDS_ENDPOINT: &str = "/fields/content/categories";
pub const MEDIA_FILES_ENDPOINT: &str = "/media/files";
pub const LANGUAGES_ENDPOINT: &str = "/languages/content";

/// Virtual volume every media path is namespaced under
pub const MEDIA_VOLUME: &str = "local-images:";

/// CMS entity a handler targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Article,
    Category,
    Tag,
    Media,
    Field,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Article,
        Resource::Category,
        Resource::Field,
        Resource::Media,
        Resource::Tag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Article => "article",
            Resource::Category => "category",
            Resource::Tag => "tag",
            Resource::Media => "media",
            Resource::Field => "field",
        }
    }

    /// Operations offered for this resource, in picker order
    pub fn operations(&self) -> &'static [Operation] {
        match self {
            Resource::Article | Resource::Category | Resource::Tag | Resource::Field => &[
                Operation::Create,
                Operation::Delete,
                Operation::Get,
                Operation::GetAll,
                Operation::Update,
            ],
            Resource::Media => &[
                Operation::CreateFolder,
                Operation::Delete,
                Operation::List,
                Operation::Upload,
            ],
        }
    }

    pub fn default_operation(&self) -> Operation {
        match self {
            Resource::Media => Operation::List,
            _ => Operation::GetAll,
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// Fail with a node error when the pair is not offered
    pub fn check(&self, operation: Operation) -> Result<(), NodeError> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(NodeError::UnknownOperation {
                resource: self.as_str().to_string(),
                operation: operation.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| NodeError::UnknownResource(s.to_string()))
    }
}

/// Action requested against a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Get,
    GetAll,
    Update,
    Delete,
    List,
    Upload,
    CreateFolder,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Get,
        Operation::GetAll,
        Operation::Update,
        Operation::Delete,
        Operation::List,
        Operation::Upload,
        Operation::CreateFolder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::GetAll => "getAll",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
            Operation::Upload => "upload",
            Operation::CreateFolder => "createFolder",
        }
    }

    /// Label shown in the operation picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Get => "Get",
            Operation::GetAll => "Get Many",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::List => "List",
            Operation::Upload => "Upload",
            Operation::CreateFolder => "Create Folder",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an operation name in the context of a resource
pub fn parse_operation(resource: Resource, name: &str) -> Result<Operation, NodeError> {
    let operation = Operation::ALL
        .iter()
        .copied()
        .find(|o| o.as_str() == name)
        .ok_or_else(|| NodeError::UnknownOperation {
            resource: resource.as_str().to_string(),
            operation: name.to_string(),
        })?;
    resource.check(operation)?;
    Ok(operation)
}

/// Join a folder path onto the media volume (`local-images:/<path>`)
pub fn media_path(path: &str) -> String {
    format!("{}/{}", MEDIA_VOLUME, path)
}
