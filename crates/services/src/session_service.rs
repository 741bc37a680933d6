use std::sync::{Arc, Mutex};

use log::warn;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use storage::auth::{AuthProvider, Identity};

/// Snapshot of the authentication state.
///
/// While `resolving` is true the provider has not yet answered whether a
/// session exists; consumers must not treat the absent identity as a
/// signed-out user until it flips to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub resolving: bool,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Owns the process-wide authentication state.
///
/// One instance lives for the whole app run: `init` resolves any
/// pre-existing session and then listens for provider-side changes until
/// the service is dropped. Consumers observe state through
/// [`SessionService::subscribe`] instead of reaching for a global.
pub struct SessionService {
    auth: Arc<dyn AuthProvider>,
    state: Arc<watch::Sender<SessionState>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let (tx, _rx) = watch::channel(SessionState {
            identity: None,
            resolving: true,
        });
        Self {
            auth,
            state: Arc::new(tx),
            listener: Mutex::new(None),
        }
    }

    /// Resolve any existing session, then follow provider pushes for the
    /// rest of the service's lifetime.
    ///
    /// A resolution failure is logged and treated as "no session": the
    /// app degrades to the signed-out state rather than blocking.
    pub async fn init(&self) {
        let identity = match self.auth.current_session().await {
            Ok(identity) => identity,
            Err(err) => {
                warn!("session resolution failed: {err}");
                None
            }
        };
        self.state.send_replace(SessionState {
            identity,
            resolving: false,
        });

        let mut pushes = self.auth.subscribe();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            while pushes.changed().await.is_ok() {
                let identity = pushes.borrow_and_update().clone();
                state.send_replace(SessionState {
                    identity,
                    resolving: false,
                });
            }
        });

        if let Ok(mut guard) = self.listener.lock()
            && let Some(previous) = guard.replace(handle)
        {
            previous.abort();
        }
    }

    /// Set the identity synchronously, right after a successful sign-in,
    /// so the UI never renders a signed-out frame while the provider's
    /// own push is still in flight.
    pub fn login(&self, identity: Identity) {
        self.state.send_replace(SessionState {
            identity: Some(identity),
            resolving: false,
        });
    }

    /// Clear the identity immediately and request provider sign-out in
    /// the background; the local state does not wait for confirmation.
    pub fn logout(&self) {
        self.state.send_replace(SessionState {
            identity: None,
            resolving: false,
        });

        let auth = Arc::clone(&self.auth);
        tokio::spawn(async move {
            if let Err(err) = auth.sign_out().await {
                warn!("provider sign-out failed: {err}");
            }
        });
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        Arc::clone(&self.auth)
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.listener.lock()
            && let Some(handle) = guard.take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::auth::MockAuthProvider;

    fn service_with(auth: MockAuthProvider) -> SessionService {
        SessionService::new(Arc::new(auth))
    }

    #[tokio::test]
    async fn starts_resolving_until_init_completes() {
        let auth = MockAuthProvider::new();
        let service = service_with(auth);

        assert!(service.state().resolving);
        assert!(!service.state().is_authenticated());

        service.init().await;
        let state = service.state();
        assert!(!state.resolving);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn init_picks_up_an_established_session() {
        let auth = MockAuthProvider::new();
        let identity = auth.register("ana@example.com", "secret");
        let service = service_with(auth.with_session(identity.clone()));

        service.init().await;
        assert_eq!(service.state().identity, Some(identity));
    }

    #[tokio::test]
    async fn login_is_synchronous() {
        let auth = MockAuthProvider::new();
        let identity = auth.register("ana@example.com", "secret");
        let service = service_with(auth);
        service.init().await;

        service.login(identity.clone());
        assert_eq!(service.state().identity, Some(identity));
    }

    #[tokio::test]
    async fn logout_clears_before_the_provider_confirms() {
        let auth = MockAuthProvider::new();
        let identity = auth.register("ana@example.com", "secret");
        let service = service_with(auth.with_session(identity));
        service.init().await;
        assert!(service.state().is_authenticated());

        service.logout();
        // No await between logout and this read: the clear is local.
        assert!(!service.state().is_authenticated());
    }

    #[tokio::test]
    async fn provider_pushes_reach_subscribers() {
        let auth = MockAuthProvider::new();
        let identity = auth.register("ana@example.com", "secret");
        let service = service_with(auth.clone());
        service.init().await;

        let mut rx = service.subscribe();
        auth.push_session(Some(identity.clone()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().identity, Some(identity));

        auth.push_session(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow().identity.is_none());
    }
}
