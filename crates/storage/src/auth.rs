use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use quiz_core::model::UserId;

/// Errors surfaced by the identity provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("sign-up rejected")]
    SignUpRejected,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The authenticated identity the provider hands back: a stable user id
/// plus the sign-in email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    email: String,
}

impl Identity {
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Contract for the hosted identity provider.
///
/// Session changes are pushed through a watch channel so that consumers
/// can react to provider-side sign-outs without polling.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange email/password for an identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for any rejected login.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SignUpRejected` when the provider refuses.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Invalidate the current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for connection failures.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The identity of any already-established session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for connection failures.
    async fn current_session(&self) -> Result<Option<Identity>, AuthError>;

    /// Receiver for provider-pushed session changes.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// In-memory identity provider for tests and the offline demo mode.
#[derive(Clone)]
pub struct MockAuthProvider {
    accounts: Arc<Mutex<HashMap<String, (String, Identity)>>>,
    session: Arc<watch::Sender<Option<Identity>>>,
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthProvider {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            session: Arc::new(tx),
        }
    }

    /// Register an account without going through `sign_up`.
    pub fn register(&self, email: &str, password: &str) -> Identity {
        let identity = Identity::new(UserId::new(Uuid::new_v4()), email);
        let mut guard = self.accounts.lock().expect("account lock");
        guard.insert(email.to_string(), (password.to_string(), identity.clone()));
        identity
    }

    /// Prime an established session, as if the user signed in earlier.
    #[must_use]
    pub fn with_session(self, identity: Identity) -> Self {
        self.session.send_replace(Some(identity));
        self
    }

    /// Simulate a provider-side session change (e.g. remote sign-out).
    pub fn push_session(&self, identity: Option<Identity>) {
        self.session.send_replace(identity);
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let guard = self
                .accounts
                .lock()
                .map_err(|e| AuthError::Connection(e.to_string()))?;
            match guard.get(email) {
                Some((stored, identity)) if stored == password => identity.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let mut guard = self
                .accounts
                .lock()
                .map_err(|e| AuthError::Connection(e.to_string()))?;
            if guard.contains_key(email) {
                return Err(AuthError::SignUpRejected);
            }
            let identity = Identity::new(UserId::new(Uuid::new_v4()), email);
            guard.insert(email.to_string(), (password.to_string(), identity.clone()));
            identity
        };
        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.send_replace(None);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self.session.borrow().clone())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }
}
