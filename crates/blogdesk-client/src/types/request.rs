//! Outbound request descriptions.

use crate::error::Result;
use bytes::Bytes;
use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One logical API call: method, path, optional JSON body and whether a
/// bearer credential should be attempted.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub authorize: bool,
}

impl ApiRequest {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authorize: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path).with_method(Method::POST)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(path).with_method(Method::PUT)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path).with_method(Method::DELETE)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Skip the bearer credential and the refresh-on-401 retry.
    pub fn anonymous(mut self) -> Self {
        self.authorize = false;
        self
    }
}

/// A fully resolved HTTP request as handed to a [`crate::traits::Network`].
#[derive(Clone, Debug, Default)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
    /// Send cookies along (`credentials: "include"` in the browser).
    pub with_credentials: bool,
}

impl WireRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| std::str::from_utf8(b).ok())
    }
}
