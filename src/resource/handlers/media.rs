//! Media manager files (`/media/files`)
//!
//! Every path lives on the `local-images:` volume. Folder listings need a
//! trailing slash; deletes must not have one.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::unsupported;
use crate::joomla::{HttpMethod, JoomlaClient};
use crate::node::params::{member_bool, member_string, BinaryData, Parameters};
use crate::resource::protocol::{
    media_path, Operation, Resource, MEDIA_FILES_ENDPOINT, MEDIA_VOLUME,
};

/// File name used when neither the options nor the binary carry one
const FALLBACK_FILE_NAME: &str = "uploaded-file";

/// Marker Joomla puts in the error when the target folder exists
const FOLDER_EXISTS_MARKER: &str = "File exists";

#[derive(Debug, Clone, PartialEq)]
pub enum MediaRequest {
    List {
        folder: String,
        search: Option<String>,
    },
    Upload {
        destination: String,
        file_name: String,
        content: Vec<u8>,
    },
    CreateFolder {
        parent: String,
        name: String,
        ignore_if_exists: bool,
    },
    Delete {
        path: String,
    },
}

/// Pick the upload name: explicit option, then the binary's own name
fn upload_file_name(option: Option<String>, binary: &BinaryData) -> String {
    option
        .or_else(|| binary.file_name.clone().filter(|n| !n.is_empty()))
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

impl MediaRequest {
    pub fn bind(operation: Operation, params: &Parameters<'_>) -> Result<Self> {
        Ok(match operation {
            Operation::List => {
                let options = params.object("options")?;
                MediaRequest::List {
                    folder: params.string("folderPath")?,
                    search: member_string(&options, "search"),
                }
            }
            Operation::Upload => {
                let options = params.object("options")?;
                let binary = params.binary(&params.string("binaryPropertyName")?)?;
                MediaRequest::Upload {
                    destination: params.string("destinationFolder")?,
                    file_name: upload_file_name(member_string(&options, "fileName"), &binary),
                    content: binary.data,
                }
            }
            Operation::CreateFolder => {
                let options = params.object("options")?;
                MediaRequest::CreateFolder {
                    parent: params.string("parentFolder")?,
                    name: params.string("folderName")?,
                    ignore_if_exists: member_bool(&options, "ignoreIfExists").unwrap_or(true),
                }
            }
            Operation::Delete => MediaRequest::Delete {
                path: params.string("path")?,
            },
            other => return Err(unsupported(Resource::Media, other)),
        })
    }
}

/// Listing path for a folder: `local-images:/<folder>/`, or the volume root
fn listing_path(folder: &str) -> String {
    if folder.is_empty() {
        format!("{}/", MEDIA_VOLUME)
    } else {
        format!("{}/", media_path(folder))
    }
}

pub async fn handle(client: &JoomlaClient, request: MediaRequest) -> Result<Value> {
    match request {
        MediaRequest::List { folder, search } => {
            let mut query = Map::new();
            query.insert("path".to_string(), Value::from(listing_path(&folder)));
            if let Some(search) = search {
                query.insert("filter[search]".to_string(), Value::from(search));
            }
            Ok(client
                .request(HttpMethod::Get, MEDIA_FILES_ENDPOINT, Map::new(), query)
                .await?)
        }
        MediaRequest::Upload {
            destination,
            file_name,
            content,
        } => {
            let path = media_path(&format!("{}/{}", destination, file_name));
            debug!("Uploading {} bytes to {}", content.len(), path);
            let mut body = Map::new();
            body.insert("path".to_string(), Value::from(path));
            body.insert("content".to_string(), Value::from(BASE64.encode(&content)));
            Ok(client
                .request(HttpMethod::Post, MEDIA_FILES_ENDPOINT, body, Map::new())
                .await?)
        }
        MediaRequest::CreateFolder {
            parent,
            name,
            ignore_if_exists,
        } => {
            let relative = format!("{}/{}", parent, name);
            let mut body = Map::new();
            body.insert("path".to_string(), Value::from(media_path(&relative)));
            body.insert("override".to_string(), Value::from(ignore_if_exists));

            match client
                .request(HttpMethod::Post, MEDIA_FILES_ENDPOINT, body, Map::new())
                .await
            {
                Ok(response) => Ok(response),
                Err(e) if ignore_if_exists && e.payload_contains(FOLDER_EXISTS_MARKER) => {
                    warn!("Folder {} already exists, treating as success", relative);
                    Ok(json!({
                        "success": true,
                        "message": "Folder already exists",
                        "path": relative,
                    }))
                }
                Err(e) => Err(e.into()),
            }
        }
        MediaRequest::Delete { path } => {
            let endpoint = format!("{}/{}", MEDIA_FILES_ENDPOINT, media_path(&path));
            Ok(client
                .request(HttpMethod::Delete, &endpoint, Map::new(), Map::new())
                .await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joomla::ApiError;
    use crate::test_support::{MockContext, MockTransport};

    fn binary(name: Option<&str>) -> BinaryData {
        BinaryData {
            data: b"hello".to_vec(),
            file_name: name.map(str::to_string),
            mime_type: Some("text/plain".to_string()),
        }
    }

    fn exists_error() -> ApiError {
        ApiError::from_response(
            500,
            r#"{"errors":[{"title":"Could not create folder: File exists","code":500}]}"#,
        )
    }

    #[test]
    fn test_upload_file_name_priority() {
        assert_eq!(
            upload_file_name(Some("custom.txt".to_string()), &binary(Some("orig.txt"))),
            "custom.txt"
        );
        assert_eq!(upload_file_name(None, &binary(Some("orig.txt"))), "orig.txt");
        assert_eq!(upload_file_name(None, &binary(Some(""))), "uploaded-file");
        assert_eq!(upload_file_name(None, &binary(None)), "uploaded-file");
    }

    #[test]
    fn test_listing_path() {
        assert_eq!(listing_path("images/banners"), "local-images:/images/banners/");
        assert_eq!(listing_path(""), "local-images:/");
    }

    #[tokio::test]
    async fn test_list_uses_path_query() {
        let ctx = MockContext::new(vec![json!({"options": {"search": "logo"}})]);
        let params = Parameters::new(&ctx, 0, Resource::Media, Operation::List);
        let request = MediaRequest::bind(Operation::List, &params).unwrap();

        let mock = MockTransport::new(vec![Ok(json!({"data": []}))]);
        handle(&mock.client(), request).await.unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.endpoint, "/media/files");
        assert_eq!(req.query_param("path"), Some(&json!("local-images:/images/")));
        assert_eq!(req.query_param("filter[search]"), Some(&json!("logo")));
    }

    #[tokio::test]
    async fn test_upload_sends_base64_content() {
        let ctx = MockContext::new(vec![json!({"destinationFolder": "images/docs"})])
            .with_binary(0, "data", binary(Some("note.txt")));
        let params = Parameters::new(&ctx, 0, Resource::Media, Operation::Upload);
        let request = MediaRequest::bind(Operation::Upload, &params).unwrap();

        let mock = MockTransport::new(vec![Ok(json!({"data": {}}))]);
        handle(&mock.client(), request).await.unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            Value::Object(req.body.clone().unwrap()),
            json!({"path": "local-images:/images/docs/note.txt", "content": "aGVsbG8="})
        );
    }

    #[test]
    fn test_upload_without_binary_fails() {
        let ctx = MockContext::new(vec![json!({"binaryPropertyName": "file"})]);
        let params = Parameters::new(&ctx, 0, Resource::Media, Operation::Upload);
        let err = MediaRequest::bind(Operation::Upload, &params).unwrap_err();
        assert_eq!(err.to_string(), "Item 0 has no binary data in property 'file'");
    }

    #[tokio::test]
    async fn test_create_folder_defaults_override_on() {
        let ctx = MockContext::new(vec![json!({"folderName": "2024"})]);
        let params = Parameters::new(&ctx, 0, Resource::Media, Operation::CreateFolder);
        let request = MediaRequest::bind(Operation::CreateFolder, &params).unwrap();
        assert_eq!(
            request,
            MediaRequest::CreateFolder {
                parent: "images".to_string(),
                name: "2024".to_string(),
                ignore_if_exists: true,
            }
        );

        let mock = MockTransport::new(vec![Ok(json!({"data": {}}))]);
        handle(&mock.client(), request).await.unwrap();
        assert_eq!(
            Value::Object(mock.requests()[0].body.clone().unwrap()),
            json!({"path": "local-images:/images/2024", "override": true})
        );
    }

    #[tokio::test]
    async fn test_create_folder_existing_is_success_when_ignored() {
        let mock = MockTransport::new(vec![Err(exists_error())]);
        let response = handle(
            &mock.client(),
            MediaRequest::CreateFolder {
                parent: "images".to_string(),
                name: "2024".to_string(),
                ignore_if_exists: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            response,
            json!({"success": true, "message": "Folder already exists", "path": "images/2024"})
        );
    }

    #[tokio::test]
    async fn test_create_folder_existing_fails_when_not_ignored() {
        let mock = MockTransport::new(vec![Err(exists_error())]);
        let err = handle(
            &mock.client(),
            MediaRequest::CreateFolder {
                parent: "images".to_string(),
                name: "2024".to_string(),
                ignore_if_exists: false,
            },
        )
        .await
        .unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.status, Some(500));
    }

    #[tokio::test]
    async fn test_create_folder_other_errors_propagate() {
        let mock = MockTransport::new(vec![Err(ApiError::from_response(403, "Forbidden"))]);
        let result = handle(
            &mock.client(),
            MediaRequest::CreateFolder {
                parent: "images".to_string(),
                name: "x".to_string(),
                ignore_if_exists: true,
            },
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_puts_path_in_endpoint() {
        let mock = MockTransport::new(vec![Ok(Value::Null)]);
        handle(
            &mock.client(),
            MediaRequest::Delete {
                path: "images/old.jpg".to_string(),
            },
        )
        .await
        .unwrap();
        let req = &mock.requests()[0];
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.endpoint, "/media/files/local-images:/images/old.jpg");
    }
}
