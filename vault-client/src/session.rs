use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use validator::Validate;

use crate::error::ApiError;
use crate::models::{Credentials, Identity};
use crate::services::{AuthApi, BearerToken};
use crate::storage::TokenStore;
use crate::utils::jwt;

/// Authentication state observable by views. Identity is present iff the
/// status is `Authenticated`; no "why it failed" ever leaks out of the
/// guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Constructed but `initialize` has not run yet.
    #[default]
    Uninitialized,
    /// Persisted token read, validity not yet decided. Protected views must
    /// not mount while the session resolves.
    Resolving,
    Authenticated,
    Unauthenticated,
}

/// Immutable outward view of the session, the only thing handed to the view
/// tree besides the operation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub identity: Option<Identity>,
}

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    identity: Option<Identity>,
}

/// Owns the token lifecycle: reads the persisted token at startup, decides
/// whether the visitor is authenticated, arms the outbound transport with a
/// valid token, and tears everything down on logout or detected expiry.
///
/// The guard is the sole writer of the persisted token. Every change to the
/// token value (startup read, login, logout) goes back through the same
/// validation path, so a stale validity verdict is never trusted.
pub struct SessionGuard {
    auth: Arc<dyn AuthApi>,
    store: TokenStore,
    bearer: BearerToken,
    state: RwLock<SessionState>,
}

impl SessionGuard {
    pub fn new(auth: Arc<dyn AuthApi>, store: TokenStore, bearer: BearerToken) -> Self {
        Self {
            auth,
            store,
            bearer,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Resolve the persisted token into a definitive status.
    ///
    /// Synchronous on purpose: callers mount protected views only after this
    /// returns, which gives the "no flash of unauthenticated content"
    /// ordering for free. Malformed and expired tokens are indistinguishable
    /// from the outside; both clear the slot and end `Unauthenticated`.
    pub fn initialize(&self) {
        self.write().status = SessionStatus::Resolving;
        let token = self.store.load();
        self.revalidate(token);
    }

    /// Authenticate with the remote service. On success the returned token
    /// is persisted and validated exactly like a startup token; failures
    /// propagate uninterpreted and leave the session untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let token = self.auth.login(credentials).await?;

        // Persistence is best-effort: the slot is a convenience for the next
        // visit, not a requirement for this session.
        if let Err(e) = self.store.save(&token) {
            tracing::warn!("Failed to persist token: {}", e);
        }
        self.revalidate(Some(token));

        tracing::info!("User logged in");
        Ok(())
    }

    /// Create an account. Pre-validates the credentials so a too-short
    /// password never reaches the network; does not authenticate.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        credentials.validate()?;
        self.auth.register(credentials).await
    }

    /// Drop the session. Synchronous and infallible from the caller's
    /// perspective; a failure to clear the persisted slot is logged and the
    /// in-memory session still ends.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted token: {}", e);
        }
        self.bearer.clear();
        let mut state = self.write();
        state.identity = None;
        state.status = SessionStatus::Unauthenticated;
        tracing::info!("User logged out");
    }

    pub fn status(&self) -> SessionStatus {
        self.read().status
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            status: state.status,
            identity: state.identity.clone(),
        }
    }

    /// Single validation path for every token value change. All decode and
    /// expiry problems collapse into `Unauthenticated` with the persisted
    /// slot cleared; the state transition is all-or-nothing.
    fn revalidate(&self, token: Option<String>) {
        let Some(token) = token else {
            self.drop_session();
            return;
        };

        match jwt::decode_claims(&token) {
            Ok(claims) if !claims.is_expired() => {
                self.bearer.set(&token);
                let mut state = self.write();
                state.identity = Some(Identity {
                    username: claims.username,
                });
                state.status = SessionStatus::Authenticated;
            }
            Ok(_) => {
                tracing::info!("Persisted token expired");
                self.clear_and_drop_session();
            }
            Err(e) => {
                tracing::warn!("Invalid token: {}", e);
                self.clear_and_drop_session();
            }
        }
    }

    fn clear_and_drop_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted token: {}", e);
        }
        self.drop_session();
    }

    fn drop_session(&self) {
        self.bearer.clear();
        let mut state = self.write();
        state.identity = None;
        state.status = SessionStatus::Unauthenticated;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
