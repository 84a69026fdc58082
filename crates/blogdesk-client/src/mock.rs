//! Scripted [`Network`] for tests.
//!
//! Replies are handed out in order, one per request. Every request that
//! reaches the network is recorded.

use crate::error::{ClientError, Result};
use crate::traits::Network;
use crate::types::{ApiResponse, WireRequest};
use async_trait::async_trait;
use futures::channel::oneshot;
use http::Method;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

enum MockReply {
    Respond(ApiResponse),
    Fail(String),
    /// Resolves when the paired sender fires.
    Deferred(oneshot::Receiver<ApiResponse>),
}

#[derive(Default)]
pub struct MockNetwork {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<WireRequest>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ApiResponse) -> &Self {
        lock(&self.replies).push_back(MockReply::Respond(response));
        self
    }

    pub fn push_json(&self, status: u16, value: serde_json::Value) -> &Self {
        self.push(ApiResponse::json(status, &value))
    }

    pub fn push_text(&self, status: u16, body: &str) -> &Self {
        self.push(ApiResponse::text(status, body))
    }

    /// Next request fails before producing a response.
    pub fn push_failure(&self, message: &str) -> &Self {
        lock(&self.replies).push_back(MockReply::Fail(message.to_string()));
        self
    }

    /// Next request stays pending until the returned sender fires.
    pub fn push_deferred(&self) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        lock(&self.replies).push_back(MockReply::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        lock(&self.requests).clone()
    }

    /// `(method, url)` of every request, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        lock(&self.requests)
            .iter()
            .map(|r| (r.method.clone(), r.url.clone()))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Network for MockNetwork {
    async fn fetch(&self, request: WireRequest) -> Result<ApiResponse> {
        let url = request.url.clone();
        lock(&self.requests).push(request);
        let reply = lock(&self.replies).pop_front();

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(ClientError::Request(message)),
            Some(MockReply::Deferred(rx)) => rx
                .await
                .map_err(|_| ClientError::Request("deferred reply dropped".to_string())),
            None => Err(ClientError::Request(format!("no scripted reply for {}", url))),
        }
    }
}
