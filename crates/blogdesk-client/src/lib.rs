//! HTTP side of the Blogdesk front end.
//!
//! [`SessionStore`] holds the signed-in user and access token, [`ApiClient`]
//! sends JSON requests with bearer auth and a single refresh-and-retry on
//! 401, and the `api` module adds one typed method per endpoint.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use api::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use client::{ApiClient, ClientConfig};
pub use error::{ClientError, Result};
pub use models::{
    AuthGrant, Category, CategoryPayload, Credentials, Post, PostPayload, Role, RoleUpdate,
    UserProfile,
};
pub use session::{AuthUpdate, Session, SessionListener, SessionStore};
pub use traits::Network;
pub use types::{ApiRequest, ApiResponse, Payload, WireRequest};
