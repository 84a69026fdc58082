//! HTTP response as returned by a [`crate::traits::Network`].

use bytes::Bytes;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        ApiResponse {
            status,
            status_text: canonical_reason(status).to_string(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// JSON response with the matching content type.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string()).with_header("content-type", "application/json")
    }

    /// Plain-text response with the matching content type.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body.into()).with_header("content-type", "text/plain; charset=utf-8")
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

impl Default for ApiResponse {
    fn default() -> Self {
        ApiResponse::new(200, Bytes::new())
    }
}

fn canonical_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}
