//! Row shapes for the hosted tables and their conversion into domain
//! types. Untyped payloads stop here: a row that fails validation is
//! rejected (or skipped by the caller) instead of crossing into
//! services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    Challenge, ChallengeId, Profile, Progress, Question, QuestionId, UserId,
};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn non_negative(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRow {
    pub id: UserId,
    pub name: String,
    pub total_score: Option<i64>,
}

impl ProfileRow {
    pub(crate) fn into_profile(self) -> Result<Profile, StorageError> {
        let total_score = non_negative("total_score", self.total_score.unwrap_or(0))?;
        Profile::new(self.id, self.name, total_score).map_err(ser)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProfileRow<'a> {
    pub id: UserId,
    pub name: &'a str,
    pub total_score: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TotalScorePatch {
    pub total_score: u32,
}

/// Nested relation selection (`select=*,questions(id)`) yields one stub
/// per question; presence is all the catalog needs.
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionStub {
    #[allow(dead_code)]
    pub id: QuestionId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChallengeRow {
    pub id: ChallengeId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub required_score: Option<i64>,
    #[serde(default)]
    pub questions: Vec<QuestionStub>,
}

impl ChallengeRow {
    pub(crate) fn into_challenge(self) -> Result<Challenge, StorageError> {
        let required_score = non_negative("required_score", self.required_score.unwrap_or(0))?;
        Challenge::new(
            self.id,
            self.title,
            self.description.unwrap_or_default(),
            required_score,
            !self.questions.is_empty(),
        )
        .map_err(ser)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TitleRow {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionRow {
    pub id: QuestionId,
    pub challenge_id: ChallengeId,
    pub word: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl QuestionRow {
    pub(crate) fn into_question(self) -> Result<Question, StorageError> {
        Question::new(self.id, self.challenge_id, self.word, self.image, self.options)
            .map_err(ser)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRow {
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    #[serde(default)]
    pub completed: bool,
    pub score: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressRow {
    pub(crate) fn into_progress(self) -> Result<Progress, StorageError> {
        let score = non_negative("score", self.score.unwrap_or(0))?;
        Progress::new(
            self.user_id,
            self.challenge_id,
            self.completed,
            score,
            self.updated_at.unwrap_or_else(Utc::now),
        )
        .map_err(ser)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressUpsertRow {
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub completed: bool,
    pub score: u32,
    pub updated_at: DateTime<Utc>,
}

impl ProgressUpsertRow {
    pub(crate) fn from_progress(progress: &Progress) -> Self {
        Self {
            user_id: progress.user_id(),
            challenge_id: progress.challenge_id(),
            completed: progress.completed(),
            score: progress.score(),
            updated_at: progress.updated_at(),
        }
    }
}
