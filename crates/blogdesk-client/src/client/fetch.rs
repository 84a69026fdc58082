//! Main Blogdesk HTTP client implementation.

use crate::client::config::ClientConfig;
#[cfg(not(target_arch = "wasm32"))]
use crate::client::native_network::NativeNetwork;
use crate::client::retry::{RetryDecision, RetryState};
#[cfg(target_arch = "wasm32")]
use crate::client::wasm_network::WasmNetwork;
use crate::error::{ClientError, Result};
use crate::models::AuthGrant;
use crate::session::SessionStore;
use crate::traits::Network;
use crate::types::{ApiRequest, ApiResponse, Payload, WireRequest};
use bytes::Bytes;
use std::sync::Arc;

const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Authenticated JSON client for the blog API.
///
/// Cheap to clone; clones share the transport, the configuration and the
/// session.
#[derive(Clone)]
pub struct ApiClient {
    network: Arc<dyn Network>,
    config: Arc<ClientConfig>,
    session: SessionStore,
}

impl ApiClient {
    /// Client over the platform transport: reqwest natively, `fetch` on wasm32.
    pub fn new(config: ClientConfig, session: SessionStore) -> Result<Self> {
        config.validate()?;

        #[cfg(not(target_arch = "wasm32"))]
        let network: Arc<dyn Network> =
            Arc::new(NativeNetwork::from_config(&config, session.blob_store())?);
        #[cfg(target_arch = "wasm32")]
        let network: Arc<dyn Network> = Arc::new(WasmNetwork::new());

        Ok(ApiClient {
            network,
            config: Arc::new(config),
            session,
        })
    }

    pub fn with_network(
        network: Arc<dyn Network>,
        config: ClientConfig,
        session: SessionStore,
    ) -> Result<Self> {
        config.validate()?;
        Ok(ApiClient {
            network,
            config: Arc::new(config),
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send one API request.
    ///
    /// A 401 on an authorized request triggers one session refresh; when the
    /// refresh succeeds the request is replayed once and that outcome is
    /// final. A failed refresh leaves the original 401 to be reported. The
    /// refresh budget is kept by [`RetryState`].
    pub async fn request(&self, request: ApiRequest) -> Result<Payload> {
        let mut retry_state = RetryState::new();
        let mut response = self.send(&request).await?;

        while retry_state.should_retry_status(response.status, request.authorize)
            == RetryDecision::RefreshAndRetry
        {
            if self.config.enable_logging {
                tracing::warn!(
                    "{} {} returned 401 (attempt {}), refreshing session",
                    request.method,
                    request.path,
                    retry_state.attempts
                );
            }
            if !self.refresh_session().await {
                break;
            }
            response = self.send(&request).await?;
        }

        into_payload(response)
    }

    /// Exchange the refresh cookie for a new token and user.
    ///
    /// On success the grant is written into the session; on any failure the
    /// session is cleared. Never returns an error.
    pub async fn refresh_session(&self) -> bool {
        let outcome = async {
            let request = ApiRequest::post(REFRESH_PATH).anonymous();
            let response = self.send(&request).await?;
            into_payload(response)?.decode::<AuthGrant>()
        }
        .await;

        match outcome {
            Ok(grant) => {
                tracing::debug!("Session refreshed for {}", grant.user.email);
                self.session.set_auth(grant);
                true
            }
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                self.session.clear_auth();
                false
            }
        }
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let wire = self.prepare(request)?;
        self.log_request(&wire);
        let response = self.network.fetch(wire).await?;
        self.log_response(request, &response);
        Ok(response)
    }

    fn prepare(&self, request: &ApiRequest) -> Result<WireRequest> {
        let url = self.config.url_for(&request.path, &request.query)?;
        let mut wire = WireRequest::new(request.method.clone(), url)
            .with_header("Content-Type", "application/json");
        wire.with_credentials = self.config.with_credentials;

        if request.authorize {
            if let Some(token) = self.session.access_token() {
                wire = wire.with_header("Authorization", format!("Bearer {}", token));
            }
        }

        if let Some(body) = &request.body {
            wire.body = Some(Bytes::from(serde_json::to_vec(body)?));
        }

        Ok(wire)
    }

    fn log_request(&self, wire: &WireRequest) {
        if self.config.enable_logging {
            tracing::debug!(
                "[Blogdesk-Out] {} {} auth={}",
                wire.method,
                wire.url,
                wire.header("authorization").is_some()
            );
        }
    }

    fn log_response(&self, request: &ApiRequest, response: &ApiResponse) {
        if self.config.enable_logging {
            tracing::debug!(
                "[Blogdesk-In] {} {} -> {} ({} bytes)",
                request.method,
                request.path,
                response.status,
                response.body.len()
            );
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Turn a final response into a payload or the generic request error.
fn into_payload(response: ApiResponse) -> Result<Payload> {
    if !response.is_success() {
        let text = response.body_text();
        let message = if !text.is_empty() {
            text
        } else if !response.status_text.is_empty() {
            response.status_text
        } else {
            format!("HTTP {}", response.status)
        };
        return Err(ClientError::Request(message));
    }
    Payload::from_response(&response)
}
