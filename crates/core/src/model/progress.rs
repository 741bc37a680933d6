use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ChallengeId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress score out of range: {score}")]
    ScoreOutOfRange { score: u32 },
}

/// A user's best recorded outcome for one challenge.
///
/// Unique per `(user_id, challenge_id)`. The recorded score never
/// decreases; the quiz engine enforces that before writing, the store
/// does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    user_id: UserId,
    challenge_id: ChallengeId,
    completed: bool,
    score: u32,
    updated_at: DateTime<Utc>,
}

impl Progress {
    /// Build a progress row from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreOutOfRange` if the score exceeds 100.
    pub fn new(
        user_id: UserId,
        challenge_id: ChallengeId,
        completed: bool,
        score: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        if score > 100 {
            return Err(ProgressError::ScoreOutOfRange { score });
        }
        Ok(Self {
            user_id,
            challenge_id,
            completed,
            score,
            updated_at,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn challenge_id(&self) -> ChallengeId {
        self.challenge_id
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use uuid::Uuid;

    #[test]
    fn rejects_score_above_100() {
        let err = Progress::new(
            UserId::new(Uuid::new_v4()),
            ChallengeId::new(Uuid::new_v4()),
            true,
            101,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, ProgressError::ScoreOutOfRange { score: 101 });
    }

    #[test]
    fn keeps_valid_score() {
        let progress = Progress::new(
            UserId::new(Uuid::new_v4()),
            ChallengeId::new(Uuid::new_v4()),
            true,
            80,
            fixed_now(),
        )
        .unwrap();
        assert!(progress.completed());
        assert_eq!(progress.score(), 80);
    }
}
