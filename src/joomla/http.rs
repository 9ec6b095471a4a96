//! Joomla HTTP transport
//!
//! Builds JSON:API requests against `<site>/api/index.php/v1` with bearer
//! token auth and sends them with reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::credentials::{mask_credential, JoomlaCredentials};
use super::error::ApiError;

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Per-call overrides, applied after the defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

/// A single call against the Joomla API, relative to the API prefix
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    /// `None` when the caller supplied no keys; never an empty object
    pub body: Option<Map<String, Value>>,
    /// `None` when the caller supplied no keys; never an empty query string
    pub query: Option<Map<String, Value>>,
    pub options: RequestOptions,
}

impl ApiRequest {
    pub fn new(
        method: HttpMethod,
        endpoint: &str,
        body: Map<String, Value>,
        query: Map<String, Value>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            body: if body.is_empty() { None } else { Some(body) },
            query: if query.is_empty() { None } else { Some(query) },
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Look up a query parameter by its literal name (e.g. `page[offset]`)
    pub fn query_param(&self, name: &str) -> Option<&Value> {
        self.query.as_ref().and_then(|q| q.get(name))
    }

    /// Encoded query string, without the leading `?`
    pub fn query_string(&self) -> Option<String> {
        let query = self.query.as_ref()?;
        let parts: Vec<String> = query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k),
                    urlencoding::encode(&query_value(v))
                )
            })
            .collect();
        Some(parts.join("&"))
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(query_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Anything that can carry an [`ApiRequest`] to Joomla and hand back JSON
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError>;
}

/// reqwest-backed transport
pub struct JoomlaHttpClient {
    http_client: Client,
    credentials: JoomlaCredentials,
}

impl JoomlaHttpClient {
    pub fn new(credentials: JoomlaCredentials) -> Result<Self, ApiError> {
        debug!(
            "Creating Joomla HTTP client for site: {}, token: {}, skip_ssl_verification: {}",
            credentials.site_url,
            mask_credential(&credentials.api_token),
            credentials.skip_ssl_verification
        );
        let http_client = Client::builder()
            .danger_accept_invalid_certs(credentials.skip_ssl_verification)
            .build()
            .map_err(|e| ApiError::transport(&e))?;
        Ok(Self {
            http_client,
            credentials,
        })
    }

    /// Full URL for a request, query string included
    pub fn url_for(&self, request: &ApiRequest) -> String {
        let base = format!("{}{}", self.credentials.api_base(), request.endpoint);
        match request.query_string() {
            Some(qs) => format!("{}?{}", base, qs),
            None => base,
        }
    }

    fn headers_for(&self, request: &ApiRequest) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.credentials.api_token))?,
        );
        for (name, value) in &request.options.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiError::new(
                    format!("Invalid header name '{}': {}", name, e),
                    None,
                    Value::Null,
                )
            })?;
            headers.insert(name, header_value(value)?);
        }
        Ok(headers)
    }

    /// Build the reqwest request without sending it
    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request, ApiError> {
        let url = self.url_for(request);
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http_client
            .request(method, &url)
            .headers(self.headers_for(request)?);

        if let Some(body) = &request.body {
            let encoded = serde_json::to_string(body).map_err(|e| {
                ApiError::new(format!("Failed to encode body: {}", e), None, Value::Null)
            })?;
            builder = builder.body(encoded);
        }
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| ApiError::transport(&e))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|e| {
        ApiError::new(format!("Invalid header value: {}", e), None, Value::Null)
    })
}

#[async_trait]
impl ApiTransport for JoomlaHttpClient {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let http_request = self.build_request(request)?;
        let url = http_request.url().to_string();
        trace!("Sending {} request to {}", request.method.as_str(), url);
        trace!("Request body: {:?}", request.body);

        let response = self
            .http_client
            .execute(http_request)
            .await
            .map_err(|e| ApiError::transport(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::transport(&e))?;

        debug!("Response status: {}", status);
        trace!(
            "Response body (first 2000 chars): {}",
            text.chars().take(2000).collect::<String>()
        );

        if !status.is_success() {
            warn!(
                "Joomla request failed: status={}, body={}",
                status,
                text.chars().take(500).collect::<String>()
            );
            return Err(ApiError::from_response(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::decode(&text, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> JoomlaHttpClient {
        let creds = JoomlaCredentials::new("https://example.com/", "secret-token").unwrap();
        JoomlaHttpClient::new(creds).unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_empty_body_and_query_are_omitted() {
        let req = ApiRequest::new(HttpMethod::Get, "/tags", Map::new(), Map::new());
        assert!(req.body.is_none());
        assert!(req.query.is_none());
        assert_eq!(req.query_string(), None);
    }

    #[test]
    fn test_url_includes_prefix_and_encoded_query() {
        let req = ApiRequest::new(
            HttpMethod::Get,
            "/content/articles",
            Map::new(),
            object(json!({"page[limit]": 20, "filter[search]": "hello world"})),
        );
        assert_eq!(
            client().url_for(&req),
            "https://example.com/api/index.php/v1/content/articles?filter%5Bsearch%5D=hello%20world&page%5Blimit%5D=20"
        );
    }

    #[test]
    fn test_build_request_sets_auth_and_json_api_headers() {
        let req = ApiRequest::new(
            HttpMethod::Post,
            "/tags",
            object(json!({"title": "News", "parent_id": 1})),
            Map::new(),
        );
        let built = client().build_request(&req).unwrap();
        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(
            built.headers().get(AUTHORIZATION).unwrap(),
            "Bearer secret-token"
        );
        assert_eq!(built.headers().get(ACCEPT).unwrap(), JSON_API_MEDIA_TYPE);
        assert_eq!(
            built.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = built.body().and_then(|b| b.as_bytes()).unwrap();
        let decoded: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(decoded, json!({"title": "News", "parent_id": 1}));
    }

    #[test]
    fn test_get_without_body_sends_no_payload() {
        let req = ApiRequest::new(HttpMethod::Get, "/tags/3", Map::new(), Map::new());
        let built = client().build_request(&req).unwrap();
        assert!(built.body().is_none());
    }

    #[test]
    fn test_options_override_default_headers() {
        let req = ApiRequest::new(HttpMethod::Get, "/tags", Map::new(), Map::new()).with_options(
            RequestOptions {
                headers: vec![("Accept".to_string(), "application/json".to_string())],
                timeout: Some(Duration::from_secs(5)),
            },
        );
        let built = client().build_request(&req).unwrap();
        assert_eq!(built.headers().get(ACCEPT).unwrap(), "application/json");
        assert_eq!(built.timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_header_name_is_an_api_error() {
        let req = ApiRequest::new(HttpMethod::Get, "/tags", Map::new(), Map::new()).with_options(
            RequestOptions {
                headers: vec![("bad header".to_string(), "x".to_string())],
                timeout: None,
            },
        );
        let err = client().build_request(&req).unwrap_err();
        assert!(err.message.contains("Invalid header name"));
    }

    #[test]
    fn test_query_value_rendering() {
        assert_eq!(query_value(&json!("a")), "a");
        assert_eq!(query_value(&json!(5)), "5");
        assert_eq!(query_value(&json!(true)), "true");
        assert_eq!(query_value(&json!(["a", 1])), "a,1");
    }
}
