use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{ChallengeId, ChallengeOutcome, Question};

use crate::error::QuizError;

/// Upper bound on the questions played per run.
pub const MAX_QUESTIONS: usize = 20;

/// Points granted per correct answer.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Where a run currently stands.
///
/// `Feedback` is the frozen window right after a selection: the caller
/// owns the wall-clock delay and calls [`QuizEngine::advance`] when it
/// elapses. No selection is accepted while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Answering,
    Feedback { selected: String, correct: bool },
    Finished,
}

/// In-memory state machine for one challenge run.
///
/// Holds the full loaded question pool and an active sequence drawn from
/// it: a uniform shuffle truncated to [`MAX_QUESTIONS`]. Steps through
/// the sequence one question at a time, scoring selections against each
/// question's canonical answer.
pub struct QuizEngine {
    challenge_id: ChallengeId,
    challenge_title: String,
    pool: Vec<Question>,
    active: Vec<Question>,
    current: usize,
    score: u32,
    phase: QuizPhase,
}

impl QuizEngine {
    /// Create an engine over a loaded question pool.
    ///
    /// The title may still be empty at this point (its fetch runs
    /// independently); set it with [`QuizEngine::set_title`] when it
    /// arrives.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty pool.
    pub fn new<R: Rng + ?Sized>(
        challenge_id: ChallengeId,
        challenge_title: impl Into<String>,
        pool: Vec<Question>,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        if pool.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        let active = select_sequence(&pool, rng);
        Ok(Self {
            challenge_id,
            challenge_title: challenge_title.into(),
            pool,
            active,
            current: 0,
            score: 0,
            phase: QuizPhase::Answering,
        })
    }

    #[must_use]
    pub fn challenge_id(&self) -> ChallengeId {
        self.challenge_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.challenge_title
    }

    /// Attach the challenge title once its fetch lands. Letter answers
    /// are resolved against it, so it should arrive before the first
    /// selection under normal latency.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.challenge_title = title.into();
    }

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, QuizPhase::Finished)
    }

    /// Total number of questions in the active sequence.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.active.len()
    }

    /// Zero-based index of the question on screen.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            None
        } else {
            self.active.get(self.current)
        }
    }

    /// Resolve a selected option against the current question.
    ///
    /// A correct selection adds [`POINTS_PER_CORRECT`]; either way the
    /// run freezes in the feedback phase until [`QuizEngine::advance`].
    ///
    /// # Errors
    ///
    /// Returns `QuizError::FeedbackPending` while the feedback window is
    /// open and `QuizError::AlreadyFinished` after the run ended.
    pub fn choose(&mut self, option: &str) -> Result<bool, QuizError> {
        match self.phase {
            QuizPhase::Answering => {}
            QuizPhase::Feedback { .. } => return Err(QuizError::FeedbackPending),
            QuizPhase::Finished => return Err(QuizError::AlreadyFinished),
        }

        let question = self
            .active
            .get(self.current)
            .ok_or(QuizError::AlreadyFinished)?;
        let correct = question.is_correct(option, &self.challenge_title);
        if correct {
            self.score += POINTS_PER_CORRECT;
        }
        self.phase = QuizPhase::Feedback {
            selected: option.to_string(),
            correct,
        };
        Ok(correct)
    }

    /// Close the feedback window: clear the selection and move to the
    /// next question, or finish the run after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` unless a feedback window is
    /// open.
    pub fn advance(&mut self) -> Result<&QuizPhase, QuizError> {
        if !matches!(self.phase, QuizPhase::Feedback { .. }) {
            return Err(QuizError::NoSelection);
        }

        if self.current + 1 < self.active.len() {
            self.current += 1;
            self.phase = QuizPhase::Answering;
        } else {
            self.phase = QuizPhase::Finished;
        }
        Ok(&self.phase)
    }

    /// Aggregate result of a finished run.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFinished` while questions remain.
    pub fn outcome(&self) -> Result<ChallengeOutcome, QuizError> {
        if !self.is_finished() {
            return Err(QuizError::NotFinished);
        }
        Ok(ChallengeOutcome::from_score(self.score, self.active.len())?)
    }

    /// Start over from the summary screen with a fresh thread-local
    /// shuffle.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFinished` unless the run is finished.
    pub fn retake(&mut self) -> Result<(), QuizError> {
        self.retake_with(&mut rand::rng())
    }

    /// Start over from the summary screen: reset score, index, and
    /// phase, and draw a fresh shuffled sequence from the same pool.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFinished` unless the run is finished.
    pub fn retake_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        if !self.is_finished() {
            return Err(QuizError::NotFinished);
        }
        self.active = select_sequence(&self.pool, rng);
        self.current = 0;
        self.score = 0;
        self.phase = QuizPhase::Answering;
        Ok(())
    }
}

fn select_sequence<R: Rng + ?Sized>(pool: &[Question], rng: &mut R) -> Vec<Question> {
    let mut sequence = pool.to_vec();
    sequence.shuffle(rng);
    sequence.truncate(MAX_QUESTIONS);
    sequence
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("challenge_id", &self.challenge_id)
            .field("pool_len", &self.pool.len())
            .field("active_len", &self.active.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
