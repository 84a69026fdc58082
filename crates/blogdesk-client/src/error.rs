//! Error types for Blogdesk API calls.

use thiserror::Error;

/// Result type for Blogdesk API calls.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the HTTP client and the API surface.
///
/// Transport failures and non-success statuses both collapse into
/// [`ClientError::Request`]; callers only ever see the message.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    #[error("{0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn request(message: impl Into<String>) -> Self {
        ClientError::Request(message.into())
    }

    /// Message shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
