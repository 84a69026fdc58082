//! Blogdesk HTTP client implementation.

mod config;
#[cfg(not(target_arch = "wasm32"))]
mod cookie_jar;
mod fetch;
#[cfg(not(target_arch = "wasm32"))]
pub mod native_network;
pub mod retry;
#[cfg(target_arch = "wasm32")]
pub mod wasm_network;

pub use config::ClientConfig;
pub use fetch::ApiClient;
pub use retry::{RetryDecision, RetryState};
