//! Blogdesk single-page front end.
//!
//! The app is written against [`page::Page`], so routing, rendering and
//! action handling run the same in the browser (`web` module, wasm32 only)
//! and against the in-memory page used by the tests.

pub mod actions;
pub mod app;
pub mod error;
pub mod logging;
pub mod markup;
pub mod page;
pub mod router;
pub mod views;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use actions::{Action, ActionKind};
pub use app::App;
pub use error::{WebError, WebResult};
pub use page::{ActionTarget, ChromeState, ChromeView, Dialog, EventKind, FormFields, Listener, Page};
pub use router::{EditMode, Route, RouteTable};
