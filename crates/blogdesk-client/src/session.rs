//! Persistent auth store.
//!
//! Holds the access token and the signed-in user, writes both through to a
//! [`BlobStore`], and tells a registered [`SessionListener`] after every
//! change so the page chrome can redraw.

use crate::models::{AuthGrant, UserProfile};
use blogdesk_common::{BlobStore, MaybeSend, ACCESS_TOKEN_KEY, USER_KEY};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(UserProfile::is_admin)
    }
}

/// Fields to merge into the session. `None` leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthUpdate {
    pub access_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthUpdate {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            user: None,
        }
    }

    pub fn user(user: UserProfile) -> Self {
        Self {
            access_token: None,
            user: Some(user),
        }
    }
}

impl From<AuthGrant> for AuthUpdate {
    fn from(grant: AuthGrant) -> Self {
        Self {
            access_token: Some(grant.access_token),
            user: Some(grant.user),
        }
    }
}

/// Called synchronously after every session mutation.
pub trait SessionListener: MaybeSend {
    fn session_changed(&self, session: &Session);
}

impl<F> SessionListener for F
where
    F: Fn(&Session) + MaybeSend,
{
    fn session_changed(&self, session: &Session) {
        self(session)
    }
}

/// Shared handle to the session; clones see the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<Session>,
    store: Arc<dyn BlobStore>,
    listener: RwLock<Option<Arc<dyn SessionListener>>>,
}

impl SessionStore {
    /// Read the persisted session. Missing or malformed entries come back as
    /// absent fields.
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let access_token = store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty());
        let user = blogdesk_common::read_json::<UserProfile>(store.as_ref(), USER_KEY);
        debug!(
            "Loaded session: token={}, user={:?}",
            access_token.is_some(),
            user.as_ref().map(|u| &u.email)
        );

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Session { access_token, user }),
                store,
                listener: RwLock::new(None),
            }),
        }
    }

    /// Register the chrome-refresh callback, replacing any previous one.
    pub fn set_listener(&self, listener: impl SessionListener + 'static) {
        *write(&self.inner.listener) = Some(Arc::new(listener));
    }

    /// The backing store, shared with anything else that persists per-user state.
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        self.inner.store.clone()
    }

    pub fn snapshot(&self) -> Session {
        read(&self.inner.state).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        read(&self.inner.state).access_token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        read(&self.inner.state).user.clone()
    }

    /// Merge the supplied fields into memory and storage. An empty token
    /// counts as not supplied.
    pub fn set_auth(&self, update: impl Into<AuthUpdate>) {
        let update = update.into();
        {
            let mut state = write(&self.inner.state);

            if let Some(token) = update.access_token.filter(|t| !t.is_empty()) {
                if let Err(e) = self.inner.store.set(ACCESS_TOKEN_KEY, &token) {
                    warn!("Failed to persist access token: {}", e);
                }
                state.access_token = Some(token);
            }

            if let Some(user) = update.user {
                if let Err(e) = blogdesk_common::write_json(self.inner.store.as_ref(), USER_KEY, &user) {
                    warn!("Failed to persist user profile: {}", e);
                }
                state.user = Some(user);
            }
        }
        self.notify();
    }

    /// Forget the token and the user, in memory and in storage.
    pub fn clear_auth(&self) {
        {
            let mut state = write(&self.inner.state);
            *state = Session::default();
            for key in [ACCESS_TOKEN_KEY, USER_KEY] {
                if let Err(e) = self.inner.store.remove(key) {
                    warn!("Failed to remove {} from storage: {}", key, e);
                }
            }
        }
        self.notify();
    }

    fn notify(&self) {
        let listener = read(&self.inner.listener).clone();
        if let Some(listener) = listener {
            let session = self.snapshot();
            listener.session_changed(&session);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.snapshot())
            .finish_non_exhaustive()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use blogdesk_common::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn user(id: u64, email: &str) -> UserProfile {
        UserProfile {
            id,
            email: email.to_string(),
            role: Role::User,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_set_auth_roundtrip() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::load(store.clone());

        session.set_auth(AuthUpdate {
            access_token: Some("t".into()),
            user: Some(user(1, "a@b.c")),
        });

        let snap = session.snapshot();
        assert_eq!(snap.access_token.as_deref(), Some("t"));
        assert_eq!(snap.user, Some(user(1, "a@b.c")));

        let reloaded = SessionStore::load(store).snapshot();
        assert_eq!(reloaded, snap);
    }

    #[test]
    fn test_token_only_update_keeps_user() {
        let session = SessionStore::load(Arc::new(MemoryStore::new()));
        session.set_auth(AuthUpdate {
            access_token: Some("old".into()),
            user: Some(user(1, "a@b.c")),
        });

        session.set_auth(AuthUpdate::token("new"));
        assert_eq!(session.access_token().as_deref(), Some("new"));
        assert_eq!(session.user(), Some(user(1, "a@b.c")));
    }

    #[test]
    fn test_user_only_update_keeps_token() {
        let session = SessionStore::load(Arc::new(MemoryStore::new()));
        session.set_auth(AuthUpdate::token("keep-me"));

        session.set_auth(AuthUpdate::user(user(2, "x@y.z")));
        assert_eq!(session.access_token().as_deref(), Some("keep-me"));
        assert_eq!(session.user().unwrap().id, 2);
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let session = SessionStore::load(Arc::new(MemoryStore::new()));
        session.set_auth(AuthUpdate::token("t"));
        session.set_auth(AuthUpdate::token(""));
        assert_eq!(session.access_token().as_deref(), Some("t"));
    }

    #[test]
    fn test_clear_then_load_is_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionStore::load(store.clone());
        session.set_auth(AuthUpdate {
            access_token: Some("t".into()),
            user: Some(user(1, "a@b.c")),
        });

        session.clear_auth();
        assert_eq!(session.snapshot(), Session::default());

        let reloaded = SessionStore::load(store.clone()).snapshot();
        assert!(reloaded.access_token.is_none());
        assert!(reloaded.user.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_tolerates_corrupted_user() {
        let store = Arc::new(MemoryStore::with_entries([
            (ACCESS_TOKEN_KEY, "t"),
            (USER_KEY, "{broken"),
        ]));
        let snap = SessionStore::load(store).snapshot();
        assert_eq!(snap.access_token.as_deref(), Some("t"));
        assert!(snap.user.is_none());
    }

    #[test]
    fn test_listener_sees_every_mutation() {
        let session = SessionStore::load(Arc::new(MemoryStore::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let admin_seen = Arc::new(AtomicUsize::new(0));

        let (c, a) = (calls.clone(), admin_seen.clone());
        session.set_listener(move |s: &Session| {
            c.fetch_add(1, Ordering::SeqCst);
            if s.is_admin() {
                a.fetch_add(1, Ordering::SeqCst);
            }
        });

        let mut admin = user(9, "root@b.c");
        admin.role = Role::Admin;
        session.set_auth(AuthUpdate::user(admin));
        session.clear_auth();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(admin_seen.load(Ordering::SeqCst), 1);
    }
}
