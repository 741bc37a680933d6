use std::sync::Arc;

use quiz_core::Clock;
use storage::auth::AuthProvider;
use storage::repository::Storage;

use crate::catalog_service::CatalogService;
use crate::profile_service::ProfileService;
use crate::quiz::ChallengeService;
use crate::session_service::SessionService;

/// Assembles the app-facing services over one storage backend and one
/// identity provider.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionService>,
    profiles: Arc<ProfileService>,
    catalog: Arc<CatalogService>,
    challenges: Arc<ChallengeService>,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage, auth: Arc<dyn AuthProvider>) -> Self {
        let session = Arc::new(SessionService::new(auth));
        let profiles = Arc::new(ProfileService::new(Arc::clone(&storage.profiles)));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.challenges)));
        let challenges = Arc::new(ChallengeService::new(
            clock,
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.challenges),
            Arc::clone(&storage.questions),
            Arc::clone(&storage.progress),
        ));

        Self {
            session,
            profiles,
            catalog,
            challenges,
        }
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionService> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn challenges(&self) -> Arc<ChallengeService> {
        Arc::clone(&self.challenges)
    }
}
