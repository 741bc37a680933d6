use thiserror::Error;

use crate::model::ChallengeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("challenge title must not be empty")]
    EmptyTitle,
}

/// A catalog entry: a named quiz unit with an unlock threshold.
///
/// Challenges are read-only from the app's point of view. `has_questions`
/// is derived at the storage boundary from the presence of at least one
/// question row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    id: ChallengeId,
    title: String,
    description: String,
    required_score: u32,
    has_questions: bool,
}

impl Challenge {
    /// Build a challenge from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError::EmptyTitle` if the title is blank.
    pub fn new(
        id: ChallengeId,
        title: impl Into<String>,
        description: impl Into<String>,
        required_score: u32,
        has_questions: bool,
    ) -> Result<Self, ChallengeError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChallengeError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
            required_score,
            has_questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn required_score(&self) -> u32 {
        self.required_score
    }

    #[must_use]
    pub fn has_questions(&self) -> bool {
        self.has_questions
    }

    /// A challenge is unlocked once the profile's total score reaches its
    /// threshold. Playability is a separate gate.
    #[must_use]
    pub fn is_unlocked(&self, total_score: u32) -> bool {
        total_score >= self.required_score
    }

    /// Navigable iff unlocked AND it actually has questions to play.
    #[must_use]
    pub fn is_navigable(&self, total_score: u32) -> bool {
        self.has_questions && self.is_unlocked(total_score)
    }
}
