//! Client configuration: API host and credential.

use std::fmt;

use crate::error::ApiError;

/// Public Estuary API host.
pub const DEFAULT_BASE_URL: &str = "https://api.estuary.tech";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ESTUARY_API_KEY";

/// Environment variable overriding the API host.
pub const BASE_URL_ENV: &str = "ESTUARY_API_URL";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at another host, e.g. a self-hosted node or a mock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Read `ESTUARY_API_KEY` and, if set, `ESTUARY_API_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{API_KEY_ENV} is not set")))?;
        let config = Self::new(api_key);
        Ok(match lookup(BASE_URL_ENV) {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Value of the `Authorization` header sent with every request.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
