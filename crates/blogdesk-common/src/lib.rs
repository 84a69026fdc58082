//! Shared storage and configuration plumbing for Blogdesk
//!
//! Everything the front end persists lives in one flat key space:
//! ```text
//! accessToken   bearer token string
//! user          JSON-encoded user profile
//! apiBase       API base URL override
//! cookies       native cookie jar (the browser keeps its own)
//! ```
//! In the browser the key space is `localStorage`; natively it is a JSON
//! file under the user's config directory (see [`FileStore`]).

#[cfg(not(target_arch = "wasm32"))]
pub mod file_store;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "user";
pub const API_BASE_KEY: &str = "apiBase";
pub const COOKIES_KEY: &str = "cookies";

/// Used when no `apiBase` is stored.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// `Send + Sync` on native targets, nothing on wasm32.
///
/// Browser handles (`web_sys::Window`, closures) are not thread-safe, so the
/// seams shared between both targets use this instead of naming the auto
/// traits directly.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSend for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSend for T {}

/// String key-value storage with `localStorage` semantics.
///
/// Reads never fail: an unreadable entry is reported as absent. Writes
/// return an error so callers can log it.
pub trait BlobStore: MaybeSend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// API base from the store, or [`DEFAULT_API_BASE`] when unset or blank.
pub fn api_base(store: &dyn BlobStore) -> String {
    match store.get(API_BASE_KEY) {
        Some(base) if !base.trim().is_empty() => base.trim().to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}

/// Persist an API base override
pub fn save_api_base(store: &dyn BlobStore, base: &str) -> anyhow::Result<()> {
    store.set(API_BASE_KEY, base.trim())
}

/// Decode a JSON entry, treating malformed data as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring unparsable stored value for {:?}: {}", key, e);
            None
        }
    }
}

pub fn write_json<T: Serialize>(store: &dyn BlobStore, key: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
