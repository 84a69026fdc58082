//! Decoded body of a successful response.

use crate::error::Result;
use crate::types::ApiResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON when the server said so, raw text otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Decode a response according to its content type.
    ///
    /// An empty JSON-typed body becomes `null`.
    pub fn from_response(response: &ApiResponse) -> Result<Self> {
        if !response.is_json() {
            return Ok(Payload::Text(response.body_text()));
        }
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload::Json(Value::Null));
        }
        Ok(Payload::Json(serde_json::from_slice(&response.body)?))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(t) => Some(t),
            Payload::Json(_) => None,
        }
    }

    /// Deserialize into a typed model. Text payloads are parsed as JSON too,
    /// for servers that forget the content type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Json(v) => Ok(serde_json::from_value(v)?),
            Payload::Text(t) => Ok(serde_json::from_str(&t)?),
        }
    }
}
