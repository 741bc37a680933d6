#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod profile_service;
pub mod quiz;
pub mod session_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogEntry, CatalogService};
pub use error::{CatalogError, ProfileServiceError, QuizError};
pub use profile_service::ProfileService;
pub use quiz::{ChallengeService, MAX_QUESTIONS, QuizEngine, QuizPhase, SaveReport};
pub use session_service::{SessionService, SessionState};
