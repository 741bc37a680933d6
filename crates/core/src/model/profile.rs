use thiserror::Error;

use crate::model::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("profile name must not be empty")]
    EmptyName,
}

/// A user's profile row: display name plus the cumulative score that
/// gates catalog unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: UserId,
    name: String,
    total_score: u32,
}

impl Profile {
    /// Build a profile from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::EmptyName` if the name is blank.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        total_score: u32,
    ) -> Result<Self, ProfileError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            total_score,
        })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Add earned points to the running total.
    pub fn add_points(&mut self, points: u32) {
        self.total_score = self.total_score.saturating_add(points);
    }
}
