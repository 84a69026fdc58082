//! Configuration for the Blogdesk HTTP client.

use crate::error::{ClientError, Result};
use blogdesk_common::BlobStore;

/// Configuration for the Blogdesk HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and optional path prefix every API path is appended to.
    pub api_base: String,
    /// Include cookies on every request; the refresh token travels as one.
    pub with_credentials: bool,
    /// Request timeout in milliseconds. `None` waits indefinitely.
    pub request_timeout_ms: Option<u64>,
    /// Enable request logging.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base: blogdesk_common::DEFAULT_API_BASE.to_string(),
            with_credentials: true,
            request_timeout_ms: None,
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    /// API base from the `apiBase` storage key, with the default fallback.
    pub fn from_store(store: &dyn BlobStore) -> Self {
        Self::new(blogdesk_common::api_base(store))
    }

    /// Check that the API base is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api_base)
            .map_err(|e| ClientError::Config(format!("invalid API base {:?}: {}", self.api_base, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ClientError::Config(format!(
                "unsupported API base scheme: {}",
                other
            ))),
        }
    }

    /// Join the API base with an absolute API path and query pairs.
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<String> {
        let joined = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        if query.is_empty() {
            return Ok(joined);
        }
        let mut url = url::Url::parse(&joined).map_err(|e| ClientError::Config(e.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(url.into())
    }
}
