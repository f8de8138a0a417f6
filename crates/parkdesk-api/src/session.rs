// Session state shared by every request.
//
// The bearer token and the lightweight profile returned at login live here
// instead of in ambient global storage. A `Session` is built once at start-up
// and handed to the `Client` by `Arc`; persistence is delegated to a
// `TokenStore` so front-ends can back it with the OS keyring.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::models::SessionUser;

/// Persistent home for the bearer token.
///
/// Implementations log their own failures; a store that cannot save simply
/// leaves the session memory-only.
pub trait TokenStore: Send + Sync {
    /// Load a previously saved token.
    fn load(&self) -> Option<SecretString>;
    /// Persist a freshly issued token.
    fn save(&self, token: &SecretString);
    /// Forget the stored token.
    fn clear(&self);
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a token (e.g. from `--token` or an env var).
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Authenticated session: cached token, cached profile, backing store.
pub struct Session {
    store: Arc<dyn TokenStore>,
    token: RwLock<Option<SecretString>>,
    user: RwLock<Option<SessionUser>>,
}

impl Session {
    /// Build a session, loading any token the store already holds.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let token = store.load();
        if token.is_some() {
            debug!("restored bearer token from store");
        }
        Self {
            store,
            token: RwLock::new(token),
            user: RwLock::new(None),
        }
    }

    /// Memory-only session with no token.
    pub fn anonymous() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Memory-only session seeded with a token.
    pub fn with_token(token: SecretString) -> Self {
        Self::new(Arc::new(MemoryTokenStore::with_token(token)))
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// Profile returned by the last successful login in this process.
    pub fn user(&self) -> Option<SessionUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a successful login: cache and persist the token.
    pub fn store_login(&self, token: SecretString, user: Option<SessionUser>) {
        self.store.save(&token);
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Tear the session down, in memory and in the store.
    pub fn clear(&self) {
        debug!("clearing session");
        self.store.clear();
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_loads_existing_token() {
        let store = Arc::new(MemoryTokenStore::with_token(SecretString::from("abc")));
        let session = Session::new(store);
        assert!(session.is_authenticated());
    }

    #[test]
    fn clear_wipes_store_too() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(Arc::clone(&store) as Arc<dyn TokenStore>);
        session.store_login(SecretString::from("tok"), None);
        assert!(store.load().is_some());

        session.clear();
        assert!(!session.is_authenticated());
        assert!(store.load().is_none());
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let session = Session::with_token(SecretString::from(""));
        assert!(!session.is_authenticated());
    }
}
