mod engine;
mod service;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use engine::{MAX_QUESTIONS, POINTS_PER_CORRECT, QuizEngine, QuizPhase};
pub use service::{ChallengeService, SaveReport};
