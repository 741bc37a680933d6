use thiserror::Error;

use crate::model::{ChallengeId, QuestionId};
use crate::slug::asset_path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question word must not be empty")]
    EmptyWord,
    #[error("question must offer at least one option")]
    NoOptions,
}

/// A single multiple-choice question belonging to one challenge.
///
/// Two prompt shapes exist: an image prompt (the user picks the matching
/// word) and a letter prompt (the user picks the matching sign image).
/// Options keep the order the backend returned them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    challenge_id: ChallengeId,
    word: String,
    image: Option<String>,
    options: Vec<String>,
}

impl Question {
    /// Build a question from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyWord` for a blank word and
    /// `QuestionError::NoOptions` for an empty option list.
    pub fn new(
        id: QuestionId,
        challenge_id: ChallengeId,
        word: impl Into<String>,
        image: Option<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let word = word.into();
        if word.trim().is_empty() {
            return Err(QuestionError::EmptyWord);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        Ok(Self {
            id,
            challenge_id,
            word,
            image,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn challenge_id(&self) -> ChallengeId {
        self.challenge_id
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn is_image_prompt(&self) -> bool {
        self.image.is_some()
    }

    /// The option value that counts as correct for this question.
    ///
    /// Image prompts expect the literal word; letter prompts expect the
    /// sign-asset path derived from the challenge title and the word.
    #[must_use]
    pub fn canonical_answer(&self, challenge_title: &str) -> String {
        if self.image.is_some() {
            self.word.clone()
        } else {
            asset_path(challenge_title, &self.word)
        }
    }

    /// Exact string equality against the canonical answer.
    #[must_use]
    pub fn is_correct(&self, option: &str, challenge_title: &str) -> bool {
        option == self.canonical_answer(challenge_title)
    }
}
