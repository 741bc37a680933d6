use std::sync::Arc;

use log::warn;

use quiz_core::Clock;
use quiz_core::model::{
    ChallengeId, ChallengeOutcome, Profile, Progress, points_earned,
};
use storage::repository::{
    ChallengeRepository, ProfileRepository, ProgressRepository, QuestionRepository,
};

use super::engine::QuizEngine;
use crate::error::QuizError;

/// What the persistence step did with a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReport {
    /// A new best was recorded and the profile total grew.
    Saved { points_earned: u32 },
    /// The run passed but did not beat the recorded best; nothing wrote.
    NotAnImprovement,
    /// The run did not pass; nothing wrote.
    NotPassed,
}

/// Orchestrates I/O around [`QuizEngine`]: loading a run and persisting
/// its result.
#[derive(Clone)]
pub struct ChallengeService {
    clock: Clock,
    profiles: Arc<dyn ProfileRepository>,
    challenges: Arc<dyn ChallengeRepository>,
    questions: Arc<dyn QuestionRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ChallengeService {
    #[must_use]
    pub fn new(
        clock: Clock,
        profiles: Arc<dyn ProfileRepository>,
        challenges: Arc<dyn ChallengeRepository>,
        questions: Arc<dyn QuestionRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            profiles,
            challenges,
            questions,
            progress,
        }
    }

    /// Load the challenge's questions and build an engine over them.
    ///
    /// The title is fetched separately ([`ChallengeService::load_title`])
    /// so a slow title never delays the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty challenge and
    /// `QuizError::Storage` for backend failures.
    pub async fn start(&self, challenge_id: ChallengeId) -> Result<QuizEngine, QuizError> {
        let pool = self.questions.questions_for_challenge(challenge_id).await?;
        QuizEngine::new(challenge_id, String::new(), pool, &mut rand::rng())
    }

    /// Title for the run's header.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` for backend failures.
    pub async fn load_title(&self, challenge_id: ChallengeId) -> Result<String, QuizError> {
        Ok(self.challenges.challenge_title(challenge_id).await?)
    }

    /// Persist a finished run, enforcing the no-regression policy.
    ///
    /// Only passed runs write anything. The flow is read-then-compare-
    /// then-write with no transaction around it: two sessions finishing
    /// the same challenge concurrently can both pass the comparison.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` when the progress read or the upsert
    /// fails; the caller abandons the save for this session either way.
    pub async fn save_result(
        &self,
        profile: &Profile,
        challenge_id: ChallengeId,
        outcome: &ChallengeOutcome,
    ) -> Result<SaveReport, QuizError> {
        if !outcome.passed() {
            return Ok(SaveReport::NotPassed);
        }

        let existing = self
            .progress
            .get_progress(profile.id(), challenge_id)
            .await?;
        let previous = existing.as_ref().map_or(0, Progress::score);
        let percentage = outcome.percentage();

        if percentage <= previous {
            return Ok(SaveReport::NotAnImprovement);
        }

        let record = Progress::new(
            profile.id(),
            challenge_id,
            true,
            percentage,
            self.clock.now(),
        )?;
        self.progress.upsert_progress(&record).await?;

        let earned = points_earned(previous, percentage);
        let new_total = profile.total_score().saturating_add(earned);
        // The progress row is already in; a failed total update only
        // costs the points, not the completion.
        if let Err(err) = self.profiles.set_total_score(profile.id(), new_total).await {
            warn!("total score update failed: {err}");
        }

        Ok(SaveReport::Saved {
            points_earned: earned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Challenge, Question, QuestionId, UserId};
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemoryRepository, NewProfileRecord, Storage};
    use uuid::Uuid;

    struct Fixture {
        service: ChallengeService,
        storage: Storage,
        profile: Profile,
        challenge_id: ChallengeId,
    }

    async fn fixture(question_count: usize) -> Fixture {
        let repo = InMemoryRepository::new();
        let challenge_id = ChallengeId::new(Uuid::new_v4());
        repo.insert_challenge(
            Challenge::new(challenge_id, "Letra A", "", 0, false).unwrap(),
        );
        for i in 0..question_count {
            repo.insert_question(
                Question::new(
                    QuestionId::new(Uuid::new_v4()),
                    challenge_id,
                    format!("Q{i}"),
                    None,
                    vec![format!("/letra-a/q{i}.png"), "/letra-a/z.png".to_string()],
                )
                .unwrap(),
            );
        }

        let user_id = UserId::new(Uuid::new_v4());
        repo.insert_profile(NewProfileRecord::initial(user_id, "Ana"))
            .await
            .unwrap();
        let storage = Storage::from_in_memory(repo);
        let profile = storage
            .profiles
            .get_profile(user_id)
            .await
            .unwrap()
            .unwrap();

        let service = ChallengeService::new(
            fixed_clock(),
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.challenges),
            Arc::clone(&storage.questions),
            Arc::clone(&storage.progress),
        );

        Fixture {
            service,
            storage,
            profile,
            challenge_id,
        }
    }

    fn outcome(score: u32, total: usize) -> ChallengeOutcome {
        ChallengeOutcome::from_score(score, total).unwrap()
    }

    #[tokio::test]
    async fn start_builds_an_engine_over_the_pool() {
        let fx = fixture(8).await;
        let engine = fx.service.start(fx.challenge_id).await.unwrap();
        assert_eq!(engine.total_questions(), 8);
        assert_eq!(engine.title(), "");

        let title = fx.service.load_title(fx.challenge_id).await.unwrap();
        assert_eq!(title, "Letra A");
    }

    #[tokio::test]
    async fn empty_challenge_refuses_to_start() {
        let fx = fixture(0).await;
        let err = fx.service.start(fx.challenge_id).await.unwrap_err();
        assert!(matches!(err, QuizError::NoQuestions));
    }

    #[tokio::test]
    async fn failed_run_writes_nothing() {
        let fx = fixture(3).await;
        // round(30 / 20 * 10) never reaches 70 on a partial run.
        let report = fx
            .service
            .save_result(&fx.profile, fx.challenge_id, &outcome(30, 20))
            .await
            .unwrap();
        assert_eq!(report, SaveReport::NotPassed);
        assert!(
            fx.storage
                .progress
                .get_progress(fx.profile.id(), fx.challenge_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn first_pass_records_progress_and_credits_points() {
        let fx = fixture(3).await;
        // 16 correct of 20: round(160 / 20 * 10) = 80.
        let report = fx
            .service
            .save_result(&fx.profile, fx.challenge_id, &outcome(160, 20))
            .await
            .unwrap();
        assert_eq!(report, SaveReport::Saved { points_earned: 80 });

        let stored = fx
            .storage
            .progress
            .get_progress(fx.profile.id(), fx.challenge_id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.completed());
        assert_eq!(stored.score(), 80);

        let profile = fx
            .storage
            .profiles
            .get_profile(fx.profile.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.total_score(), 80);
    }

    #[tokio::test]
    async fn improvement_credits_only_the_delta() {
        let fx = fixture(3).await;
        // Previous best of 60 on record, with the matching profile total.
        let previous =
            Progress::new(fx.profile.id(), fx.challenge_id, true, 60, fixed_now()).unwrap();
        fx.storage.progress.upsert_progress(&previous).await.unwrap();
        fx.storage
            .profiles
            .set_total_score(fx.profile.id(), 60)
            .await
            .unwrap();
        let profile = fx
            .storage
            .profiles
            .get_profile(fx.profile.id())
            .await
            .unwrap()
            .unwrap();

        let report = fx
            .service
            .save_result(&profile, fx.challenge_id, &outcome(160, 20))
            .await
            .unwrap();
        assert_eq!(report, SaveReport::Saved { points_earned: 20 });

        let updated = fx
            .storage
            .profiles
            .get_profile(fx.profile.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.total_score(), 80);
    }

    #[tokio::test]
    async fn regression_never_persists() {
        let fx = fixture(3).await;
        fx.service
            .save_result(&fx.profile, fx.challenge_id, &outcome(160, 20))
            .await
            .unwrap();

        let report = fx
            .service
            .save_result(&fx.profile, fx.challenge_id, &outcome(140, 18))
            .await
            .unwrap();
        assert_eq!(report, SaveReport::NotAnImprovement);

        let stored = fx
            .storage
            .progress
            .get_progress(fx.profile.id(), fx.challenge_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.score(), 80);
        let profile = fx
            .storage
            .profiles
            .get_profile(fx.profile.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.total_score(), 80);
    }

    struct FailingProgressRepo;

    #[async_trait::async_trait]
    impl ProgressRepository for FailingProgressRepo {
        async fn get_progress(
            &self,
            _user_id: UserId,
            _challenge_id: ChallengeId,
        ) -> Result<Option<Progress>, storage::repository::StorageError> {
            Err(storage::repository::StorageError::Connection("fail".into()))
        }

        async fn upsert_progress(
            &self,
            _progress: &Progress,
        ) -> Result<(), storage::repository::StorageError> {
            Err(storage::repository::StorageError::Connection("fail".into()))
        }
    }

    #[tokio::test]
    async fn read_failure_aborts_the_save() {
        let fx = fixture(3).await;
        let service = ChallengeService::new(
            fixed_clock(),
            Arc::clone(&fx.storage.profiles),
            Arc::clone(&fx.storage.challenges),
            Arc::clone(&fx.storage.questions),
            Arc::new(FailingProgressRepo),
        );

        let err = service
            .save_result(&fx.profile, fx.challenge_id, &outcome(160, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Storage(_)));

        // Nothing was credited for the abandoned save.
        let profile = fx
            .storage
            .profiles
            .get_profile(fx.profile.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.total_score(), 0);
    }

    #[tokio::test]
    async fn equal_score_counts_as_no_improvement() {
        let fx = fixture(3).await;
        fx.service
            .save_result(&fx.profile, fx.challenge_id, &outcome(160, 20))
            .await
            .unwrap();
        let report = fx
            .service
            .save_result(&fx.profile, fx.challenge_id, &outcome(160, 20))
            .await
            .unwrap();
        assert_eq!(report, SaveReport::NotAnImprovement);
    }
}
