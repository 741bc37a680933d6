use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{Challenge, ChallengeId, Profile, Progress, Question, UserId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Initial profile row written right after sign-up.
#[derive(Debug, Clone)]
pub struct NewProfileRecord {
    pub id: UserId,
    pub name: String,
    pub total_score: u32,
}

impl NewProfileRecord {
    /// A fresh profile starts with an empty score.
    #[must_use]
    pub fn initial(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            total_score: 0,
        }
    }
}

/// Repository contract for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile row for a user, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or payload failures.
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, StorageError>;

    /// Insert the initial profile row for a freshly signed-up user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn insert_profile(&self, profile: NewProfileRecord) -> Result<(), StorageError>;

    /// Overwrite a profile's total score.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the profile does not exist.
    async fn set_total_score(&self, id: UserId, total_score: u32) -> Result<(), StorageError>;
}

/// Repository contract for the read-only challenge catalog.
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// All challenges ordered ascending by `required_score`, with
    /// `has_questions` derived from question presence.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or payload failures.
    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError>;

    /// Title of a single challenge.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the challenge does not exist.
    async fn challenge_title(&self, id: ChallengeId) -> Result<String, StorageError>;
}

/// Repository contract for questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All questions belonging to one challenge, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or payload failures.
    async fn questions_for_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<Question>, StorageError>;
}

/// Repository contract for per-user challenge progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Best recorded outcome for `(user, challenge)`; a missing row is
    /// `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or payload failures.
    async fn get_progress(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<Progress>, StorageError>;

    /// Insert or replace the progress row keyed on `(user_id, challenge_id)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_progress(&self, progress: &Progress) -> Result<(), StorageError>;
}

/// Aggregates the table repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
    pub challenges: Arc<dyn ChallengeRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo.clone());
        let challenges: Arc<dyn ChallengeRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            profiles,
            challenges,
            questions,
            progress,
        }
    }
}

/// Simple in-memory repository implementation for testing and the
/// offline demo mode.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    challenges: Arc<Mutex<Vec<Challenge>>>,
    questions: Arc<Mutex<HashMap<ChallengeId, Vec<Question>>>>,
    progress: Arc<Mutex<HashMap<(UserId, ChallengeId), Progress>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog row. `has_questions` on the seeded value is
    /// ignored; listing derives it from the question table, the same way
    /// the hosted backend's relation join does.
    pub fn insert_challenge(&self, challenge: Challenge) {
        let mut guard = self.challenges.lock().expect("challenge lock");
        guard.push(challenge);
    }

    /// Seed a question row.
    pub fn insert_question(&self, question: Question) {
        let mut guard = self.questions.lock().expect("question lock");
        guard
            .entry(question.challenge_id())
            .or_default()
            .push(question);
    }

    /// Seed a profile row directly (tests bypass the sign-up flow).
    pub fn insert_profile_row(&self, profile: Profile) {
        let mut guard = self.profiles.lock().expect("profile lock");
        guard.insert(profile.id(), profile);
    }
}

fn lock_err<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, StorageError> {
        let guard = self.profiles.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn insert_profile(&self, record: NewProfileRecord) -> Result<(), StorageError> {
        let profile = Profile::new(record.id, record.name, record.total_score)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut guard = self.profiles.lock().map_err(lock_err)?;
        guard.insert(profile.id(), profile);
        Ok(())
    }

    async fn set_total_score(&self, id: UserId, total_score: u32) -> Result<(), StorageError> {
        let mut guard = self.profiles.lock().map_err(lock_err)?;
        let profile = guard.get(&id).ok_or(StorageError::NotFound)?;
        let updated = Profile::new(profile.id(), profile.name(), total_score)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.insert(id, updated);
        Ok(())
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryRepository {
    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        let challenges = self.challenges.lock().map_err(lock_err)?;
        let questions = self.questions.lock().map_err(lock_err)?;

        let mut listed = Vec::with_capacity(challenges.len());
        for challenge in challenges.iter() {
            let has_questions = questions
                .get(&challenge.id())
                .is_some_and(|qs| !qs.is_empty());
            let rebuilt = Challenge::new(
                challenge.id(),
                challenge.title(),
                challenge.description(),
                challenge.required_score(),
                has_questions,
            )
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
            listed.push(rebuilt);
        }
        listed.sort_by_key(Challenge::required_score);
        Ok(listed)
    }

    async fn challenge_title(&self, id: ChallengeId) -> Result<String, StorageError> {
        let guard = self.challenges.lock().map_err(lock_err)?;
        guard
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.title().to_string())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn questions_for_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(lock_err)?;
        Ok(guard.get(&challenge_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<Progress>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        Ok(guard.get(&(user_id, challenge_id)).cloned())
    }

    async fn upsert_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(lock_err)?;
        guard.insert(
            (progress.user_id(), progress.challenge_id()),
            progress.clone(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use quiz_core::time::fixed_now;
    use uuid::Uuid;

    fn challenge(title: &str, required_score: u32) -> Challenge {
        Challenge::new(
            ChallengeId::new(Uuid::new_v4()),
            title,
            "",
            required_score,
            false,
        )
        .unwrap()
    }

    fn question(challenge_id: ChallengeId) -> Question {
        Question::new(
            QuestionId::new(Uuid::new_v4()),
            challenge_id,
            "A",
            None,
            vec!["/letra-a/a.png".into(), "/letra-a/b.png".into()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn listing_orders_by_required_score_and_derives_has_questions() {
        let repo = InMemoryRepository::new();
        let advanced = challenge("Letra B", 100);
        let first = challenge("Letra A", 0);
        let first_id = first.id();
        repo.insert_challenge(advanced);
        repo.insert_challenge(first);
        repo.insert_question(question(first_id));

        let listed = repo.list_challenges().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title(), "Letra A");
        assert!(listed[0].has_questions());
        assert_eq!(listed[1].title(), "Letra B");
        assert!(!listed[1].has_questions());
    }

    #[tokio::test]
    async fn missing_progress_row_is_none() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(Uuid::new_v4());
        let challenge_id = ChallengeId::new(Uuid::new_v4());
        assert!(
            repo.get_progress(user, challenge_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn upsert_replaces_on_the_composite_key() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(Uuid::new_v4());
        let challenge_id = ChallengeId::new(Uuid::new_v4());

        let first = Progress::new(user, challenge_id, true, 70, fixed_now()).unwrap();
        repo.upsert_progress(&first).await.unwrap();
        let better = Progress::new(user, challenge_id, true, 90, fixed_now()).unwrap();
        repo.upsert_progress(&better).await.unwrap();

        let stored = repo.get_progress(user, challenge_id).await.unwrap().unwrap();
        assert_eq!(stored.score(), 90);
    }

    #[tokio::test]
    async fn set_total_score_requires_an_existing_profile() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(Uuid::new_v4());
        let err = repo.set_total_score(user, 10).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        repo.insert_profile(NewProfileRecord::initial(user, "Ana"))
            .await
            .unwrap();
        repo.set_total_score(user, 10).await.unwrap();
        let profile = repo.get_profile(user).await.unwrap().unwrap();
        assert_eq!(profile.total_score(), 10);
    }
}
