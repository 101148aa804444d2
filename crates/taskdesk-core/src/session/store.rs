//! The process-wide session store.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::state::{self, SESSION_STORAGE_KEY, Session};
use super::storage::SessionStorage;
use crate::auth::{AuthService, LoginRequest, LoginResponse};
use crate::types::Identity;
use crate::{Error, Result, TRACING_TARGET_SESSION};

/// Holds the current credential and identity and keeps them in durable storage.
///
/// Clones share the same state. Every mutation is applied under a single write
/// lock, so readers never observe a credential without its identity. The lock
/// is never held across an `.await`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    state: RwLock<Session>,
    storage: Box<dyn SessionStorage>,
    auth: AuthService,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.state.read())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates an unauthenticated store.
    ///
    /// Call [`SessionStore::rehydrate`] once at startup to restore a persisted
    /// session.
    pub fn new<S>(auth: AuthService, storage: S) -> Self
    where
        S: SessionStorage + 'static,
    {
        Self {
            inner: Arc::new(SessionStoreInner {
                state: RwLock::new(Session::default()),
                storage: Box::new(storage),
                auth,
            }),
        }
    }

    /// Restores the persisted session, if any, and returns its identity.
    ///
    /// A missing entry leaves the store unauthenticated. A malformed entry is
    /// treated the same way and removed from storage.
    pub fn rehydrate(&self) -> Option<Identity> {
        let raw = match self.inner.storage.read(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(target: TRACING_TARGET_SESSION, "No persisted session");
                return None;
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_SESSION,
                    error = %error,
                    "Failed to read persisted session"
                );
                return None;
            }
        };

        match state::decode(&raw) {
            Ok(authenticated) => {
                let identity = authenticated.identity.clone();
                let mut session = self.inner.state.write();
                session.authenticated = Some(authenticated);
                session.error = None;
                drop(session);

                tracing::info!(
                    target: TRACING_TARGET_SESSION,
                    identity_id = identity.id,
                    "Session restored"
                );
                Some(identity)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_SESSION,
                    error = %error,
                    "Discarding corrupt persisted session"
                );
                self.remove_persisted();
                None
            }
        }
    }

    /// Authenticates and, on success, replaces the current session.
    ///
    /// On failure the previous credential and identity are kept, the error is
    /// recorded for display and returned.
    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Identity> {
        let request = LoginRequest::new(username, password);
        let attempt = LoginAttempt::begin(&self.inner.state);

        match self.inner.auth.authenticate(&request).await {
            Ok(authenticated) => {
                let identity = authenticated.identity.clone();
                attempt.complete(|session| {
                    self.persist(&authenticated);
                    session.authenticated = Some(authenticated);
                    session.error = None;
                });

                tracing::info!(
                    target: TRACING_TARGET_SESSION,
                    identity_id = identity.id,
                    "Signed in"
                );
                Ok(identity)
            }
            Err(error) => {
                let recorded = error.clone();
                attempt.complete(|session| session.error = Some(recorded));
                Err(error)
            }
        }
    }

    /// Clears the session and its persisted entry. Idempotent.
    pub fn logout(&self) {
        let mut session = self.inner.state.write();
        let was_authenticated = session.is_authenticated();
        session.clear();
        self.remove_persisted();
        drop(session);

        if was_authenticated {
            tracing::info!(target: TRACING_TARGET_SESSION, "Signed out");
        }
    }

    /// Tears down the session after the server rejected `access_token`.
    ///
    /// Does nothing if the current token differs, so a late rejection of an
    /// old token cannot end a newer session. Returns whether the session was
    /// cleared.
    pub fn expire(&self, access_token: &str, error: Error) -> bool {
        let mut session = self.inner.state.write();
        let is_current = session
            .credential()
            .is_some_and(|credential| credential.access_token == access_token);
        if !is_current {
            return false;
        }

        session.clear();
        session.error = Some(error);
        self.remove_persisted();
        drop(session);

        tracing::warn!(target: TRACING_TARGET_SESSION, "Session expired");
        true
    }

    /// Returns the current identity.
    pub fn current_identity(&self) -> Option<Identity> {
        self.inner.state.read().identity().cloned()
    }

    /// Returns the current bearer token.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .credential()
            .map(|credential| credential.access_token.clone())
    }

    /// Returns a consistent copy of the whole session.
    pub fn snapshot(&self) -> Session {
        self.inner.state.read().clone()
    }

    /// Returns true while a login is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.state.read().is_loading()
    }

    /// Returns the last recorded error.
    pub fn last_error(&self) -> Option<Error> {
        self.inner.state.read().error.clone()
    }

    /// Dismisses the last recorded error.
    pub fn clear_error(&self) {
        self.inner.state.write().error = None;
    }

    fn persist(&self, authenticated: &LoginResponse) {
        let result = state::encode(authenticated)
            .and_then(|raw| self.inner.storage.write(SESSION_STORAGE_KEY, &raw));

        if let Err(error) = result {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                error = %error,
                "Failed to persist session"
            );
        }
    }

    fn remove_persisted(&self) {
        if let Err(error) = self.inner.storage.remove(SESSION_STORAGE_KEY) {
            tracing::warn!(
                target: TRACING_TARGET_SESSION,
                error = %error,
                "Failed to remove persisted session"
            );
        }
    }
}

/// Tracks one in-flight login.
///
/// The in-flight counter is decremented exactly once: by `complete`, or on drop
/// if the login future is abandoned.
struct LoginAttempt<'a> {
    state: &'a RwLock<Session>,
    finished: bool,
}

impl<'a> LoginAttempt<'a> {
    fn begin(state: &'a RwLock<Session>) -> Self {
        let mut session = state.write();
        session.in_flight += 1;
        session.error = None;

        Self {
            state,
            finished: false,
        }
    }

    fn complete(mut self, apply: impl FnOnce(&mut Session)) {
        let mut session = self.state.write();
        apply(&mut session);
        session.in_flight = session.in_flight.saturating_sub(1);
        self.finished = true;
    }
}

impl Drop for LoginAttempt<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut session = self.state.write();
            session.in_flight = session.in_flight.saturating_sub(1);
        }
    }
}
