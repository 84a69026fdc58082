use crate::client::config::ClientConfig;
use crate::client::cookie_jar::PersistentJar;
use crate::error::{ClientError, Result};
use crate::traits::Network;
use crate::types::{ApiResponse, WireRequest};
use async_trait::async_trait;
use blogdesk_common::BlobStore;
use bytes::Bytes;
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub struct NativeNetwork {
    client: Client,
}

impl NativeNetwork {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a reqwest client honoring the credential and timeout settings.
    ///
    /// With credentials on, a cookie jar backed by `store` keeps the server's
    /// refresh cookie between requests and between runs, the way a browser
    /// would.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn BlobStore>) -> Result<Self> {
        let mut builder = Client::builder();
        if config.with_credentials {
            builder = builder.cookie_provider(Arc::new(PersistentJar::load(store)));
        }
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Network for NativeNetwork {
    async fn fetch(&self, request: WireRequest) -> Result<ApiResponse> {
        let mut req_builder = self.client.request(request.method.clone(), &request.url);

        for (k, v) in &request.headers {
            req_builder = req_builder.header(k, v);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_lowercase(), val.to_string());
            }
        }

        // An unreadable body is reported as empty, not as a failure.
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read response body from {}: {}", request.url, e);
                Bytes::new()
            }
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
