use std::sync::Arc;

use services::{AppServices, CatalogService, ChallengeService, ProfileService, SessionService};

/// Service handles injected at launch by the composition root and read
/// by views through `use_context`.
#[derive(Clone)]
pub struct AppContext {
    services: AppServices,
}

impl AppContext {
    #[must_use]
    pub fn new(services: AppServices) -> Self {
        Self { services }
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionService> {
        self.services.session()
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        self.services.profiles()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    #[must_use]
    pub fn challenges(&self) -> Arc<ChallengeService> {
        self.services.challenges()
    }
}

/// Build an `AppContext` from assembled services.
#[must_use]
pub fn build_app_context(services: AppServices) -> AppContext {
    AppContext::new(services)
}
