use std::sync::Arc;

use quiz_core::model::Challenge;
use storage::repository::ChallengeRepository;

use crate::error::CatalogError;

/// One catalog row plus the gates derived for the viewing profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub challenge: Challenge,
    pub unlocked: bool,
    pub playable: bool,
}

impl CatalogEntry {
    /// Entering the challenge requires both gates.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.unlocked && self.playable
    }
}

/// Loads the challenge list and derives lock state from the profile's
/// total score. No pagination, no caching.
#[derive(Clone)]
pub struct CatalogService {
    challenges: Arc<dyn ChallengeRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(challenges: Arc<dyn ChallengeRepository>) -> Self {
        Self { challenges }
    }

    /// Challenges in unlock order with per-entry gate flags.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` for backend failures.
    pub async fn catalog_for(&self, total_score: u32) -> Result<Vec<CatalogEntry>, CatalogError> {
        let challenges = self.challenges.list_challenges().await?;
        Ok(challenges
            .into_iter()
            .map(|challenge| CatalogEntry {
                unlocked: challenge.is_unlocked(total_score),
                playable: challenge.has_questions(),
                challenge,
            })
            .collect())
    }
}
