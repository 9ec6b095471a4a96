//! Joomla API credentials
//!
//! Supports:
//! - Credentials injected by the host as JSON (`siteUrl`, `apiToken`, `skipSslVerification`)
//! - Environment variables (JOOMLA_SITE_URL, JOOMLA_API_TOKEN, JOOMLA_SKIP_SSL_VERIFICATION)

use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::debug;

/// Name the host uses to look up these credentials
pub const CREDENTIALS_NAME: &str = "joomlaApi";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("Invalid site URL '{url}': {reason}")]
    InvalidSiteUrl { url: String, reason: String },

    #[error("Invalid credentials payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Joomla API credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoomlaCredentials {
    /// Base URL of the site, without the `/api/index.php` part
    pub site_url: String,
    /// Token from the user's "Joomla API Token" profile tab
    pub api_token: String,
    #[serde(default)]
    pub skip_ssl_verification: bool,
}

impl JoomlaCredentials {
    pub fn new(site_url: &str, api_token: &str) -> Result<Self, CredentialsError> {
        Self {
            site_url: site_url.to_string(),
            api_token: api_token.to_string(),
            skip_ssl_verification: false,
        }
        .validated()
    }

    /// Parse credentials handed over by the host
    pub fn from_json(payload: &serde_json::Value) -> Result<Self, CredentialsError> {
        let creds: Self = serde_json::from_value(payload.clone())?;
        creds.validated()
    }

    pub fn with_skip_ssl_verification(mut self, skip: bool) -> Self {
        self.skip_ssl_verification = skip;
        self
    }

    /// Base URL every endpoint is appended to
    pub fn api_base(&self) -> String {
        format!("{}{}", self.site_url, super::API_PREFIX)
    }

    fn validated(mut self) -> Result<Self, CredentialsError> {
        if self.api_token.trim().is_empty() {
            return Err(CredentialsError::Missing("apiToken"));
        }
        let trimmed = self.site_url.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&trimmed).map_err(|e| CredentialsError::InvalidSiteUrl {
            url: self.site_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(CredentialsError::InvalidSiteUrl {
                url: self.site_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        self.site_url = trimmed;
        Ok(self)
    }
}

/// Load credentials from environment variables
pub fn load_from_env() -> Result<JoomlaCredentials, CredentialsError> {
    let site_url =
        env::var("JOOMLA_SITE_URL").map_err(|_| CredentialsError::Missing("JOOMLA_SITE_URL"))?;
    let api_token =
        env::var("JOOMLA_API_TOKEN").map_err(|_| CredentialsError::Missing("JOOMLA_API_TOKEN"))?;
    let skip = env::var("JOOMLA_SKIP_SSL_VERIFICATION")
        .map(|v| parse_flag(&v))
        .unwrap_or(false);

    let creds = JoomlaCredentials::new(&site_url, &api_token)?.with_skip_ssl_verification(skip);
    debug!(
        "Loaded Joomla credentials from environment for {}, token: {}",
        creds.site_url,
        mask_credential(&creds.api_token)
    );
    Ok(creds)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Mask sensitive credential values for logging
pub fn mask_credential(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
