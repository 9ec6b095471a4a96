pub mod client;
pub mod credentials;
pub mod error;
pub mod http;

/// Versioned path of the Web Services API, appended to the site URL
pub const API_PREFIX: &str = "/api/index.php/v1";

pub use client::{JoomlaClient, PAGE_LIMIT};
pub use credentials::{load_from_env, CredentialsError, JoomlaCredentials};
pub use error::{ApiError, NodeError};
pub use http::{ApiRequest, ApiTransport, HttpMethod, JoomlaHttpClient, RequestOptions};
