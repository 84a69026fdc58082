use crate::error::Result;
use crate::types::{ApiResponse, WireRequest};
use async_trait::async_trait;
use blogdesk_common::MaybeSend;

/// Abstraction for network operations.
///
/// Implementations only move bytes: any HTTP status, 4xx and 5xx included,
/// is an `Ok` response. `Err` means the request never produced one.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Network: MaybeSend + 'static {
    async fn fetch(&self, request: WireRequest) -> Result<ApiResponse>;
}
