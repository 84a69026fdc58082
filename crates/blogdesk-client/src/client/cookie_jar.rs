//! Cookie jar that survives the process.
//!
//! reqwest's [`Jar`] only lives in memory, so a CLI run would forget the
//! refresh cookie the previous run received. Every `Set-Cookie` header is
//! also written to the blob store under [`COOKIES_KEY`], keyed by cookie
//! name, and replayed into a fresh jar on load. Expiry and deletion stay
//! with the jar: a replayed header that has expired is simply dropped.

use blogdesk_common::{BlobStore, COOKIES_KEY};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use url::Url;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SavedCookie {
    /// Response URL the header arrived on; it scopes domain and default path.
    url: String,
    header: String,
}

pub struct PersistentJar {
    jar: Jar,
    saved: Mutex<BTreeMap<String, SavedCookie>>,
    store: Arc<dyn BlobStore>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cookie_name(header: &str) -> Option<&str> {
    let (pair, _) = header.split_once(';').unwrap_or((header, ""));
    let (name, _) = pair.split_once('=')?;
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

impl PersistentJar {
    /// Seed a jar from whatever earlier runs saved.
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let saved: BTreeMap<String, SavedCookie> =
            blogdesk_common::read_json(store.as_ref(), COOKIES_KEY).unwrap_or_default();
        let jar = Jar::default();
        for cookie in saved.values() {
            match Url::parse(&cookie.url) {
                Ok(url) => jar.add_cookie_str(&cookie.header, &url),
                Err(e) => warn!("Skipping stored cookie from {:?}: {}", cookie.url, e),
            }
        }
        debug!("Restored {} stored cookie(s)", saved.len());

        Self {
            jar,
            saved: Mutex::new(saved),
            store,
        }
    }
}

impl CookieStore for PersistentJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&HeaderValue> = cookie_headers.collect();
        self.jar.set_cookies(&mut headers.iter().copied(), url);

        let mut saved = lock(&self.saved);
        let mut changed = false;
        for value in headers {
            let Ok(text) = value.to_str() else { continue };
            if let Some(name) = cookie_name(text) {
                let cookie = SavedCookie {
                    url: url.to_string(),
                    header: text.to_string(),
                };
                changed |= saved.insert(name.to_string(), cookie.clone()) != Some(cookie);
            }
        }
        if changed {
            if let Err(e) = blogdesk_common::write_json(self.store.as_ref(), COOKIES_KEY, &*saved) {
                warn!("Failed to persist cookies: {}", e);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}
