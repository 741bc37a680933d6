//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OutcomeError, ProfileError, ProgressError};
use storage::repository::StorageError;

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz subsystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("challenge has no questions to play")]
    NoQuestions,

    #[error("run already finished")]
    AlreadyFinished,

    #[error("feedback window still open")]
    FeedbackPending,

    #[error("run not finished yet")]
    NotFinished,

    #[error("no selection to resolve")]
    NoSelection,

    #[error(transparent)]
    Outcome(#[from] OutcomeError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
