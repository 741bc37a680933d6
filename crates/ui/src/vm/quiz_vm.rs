use log::warn;

use quiz_core::model::ChallengeOutcome;
use services::{QuizEngine, QuizPhase};

/// What the prompt area shows for the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptVm {
    /// Sign image; the user picks the matching word.
    Image(String),
    /// Big letter/word; the user picks the matching sign image.
    Word(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub value: String,
    pub is_image: bool,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub title: String,
    pub progress_width: String,
    pub question_number: usize,
    pub total_questions: usize,
    pub score: u32,
    pub prompt: PromptVm,
    pub options: Vec<OptionVm>,
    /// `Some(correct)` while the feedback window is open.
    pub feedback: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub score: u32,
    pub total_questions: usize,
    pub percentage: u32,
    pub passed: bool,
}

/// One frame of the challenge screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunSnapshot {
    Question(QuestionVm),
    Summary(SummaryVm),
}

/// Wraps the quiz engine for the challenge view: swallows the engine's
/// sequencing errors (frozen input is simply ignored) and carries the
/// once-per-visit save latch.
pub struct QuizVm {
    engine: QuizEngine,
    save_attempted: bool,
}

impl QuizVm {
    #[must_use]
    pub fn new(engine: QuizEngine) -> Self {
        Self {
            engine,
            save_attempted: false,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.engine.set_title(title);
    }

    #[must_use]
    pub fn is_answering(&self) -> bool {
        matches!(self.engine.phase(), QuizPhase::Answering)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Resolve a selection. Selections while the input is frozen (or
    /// after the run ended) are dropped.
    pub fn choose(&mut self, option: &str) {
        if let Err(err) = self.engine.choose(option) {
            warn!("selection ignored: {err}");
        }
    }

    /// Close the feedback window. Returns true when the run just
    /// finished.
    pub fn advance(&mut self) -> bool {
        match self.engine.advance() {
            Ok(QuizPhase::Finished) => true,
            Ok(_) => false,
            Err(err) => {
                warn!("advance ignored: {err}");
                false
            }
        }
    }

    /// Hand out the outcome for persistence exactly once per visit.
    /// Retakes do not re-arm the latch; only leaving and re-entering the
    /// challenge screen does.
    pub fn take_save_ticket(&mut self) -> Option<ChallengeOutcome> {
        if self.save_attempted || !self.engine.is_finished() {
            return None;
        }
        self.save_attempted = true;
        self.engine.outcome().ok()
    }

    /// Reset for another run over the same pool.
    pub fn retake(&mut self) {
        if let Err(err) = self.engine.retake() {
            warn!("retake ignored: {err}");
        }
    }

    /// Materialize the current frame for rendering. `fallback_title` is
    /// shown while the title fetch is still in flight.
    #[must_use]
    pub fn snapshot(&self, fallback_title: &str) -> RunSnapshot {
        if let Ok(outcome) = self.engine.outcome() {
            return RunSnapshot::Summary(SummaryVm {
                score: outcome.score(),
                total_questions: outcome.total_questions(),
                percentage: outcome.percentage(),
                passed: outcome.passed(),
            });
        }

        let title = if self.engine.title().is_empty() {
            fallback_title.to_string()
        } else {
            self.engine.title().to_string()
        };

        let feedback = match self.engine.phase() {
            QuizPhase::Feedback { correct, .. } => Some(*correct),
            _ => None,
        };

        let question = self.engine.current_question();
        let prompt = question.map_or(PromptVm::Word(String::new()), |q| match q.image() {
            Some(image) => PromptVm::Image(image.to_string()),
            None => PromptVm::Word(q.word().to_string()),
        });
        let options = question.map_or_else(Vec::new, |q| {
            q.options()
                .iter()
                .map(|option| OptionVm {
                    value: option.clone(),
                    is_image: is_image_ref(option),
                    class: option_class(self.engine.phase(), option),
                })
                .collect()
        });

        let total = self.engine.total_questions();
        let number = self.engine.current_index() + 1;
        #[allow(clippy::cast_precision_loss)]
        let width = if total == 0 {
            0.0
        } else {
            number as f64 / total as f64 * 100.0
        };

        RunSnapshot::Question(QuestionVm {
            title,
            progress_width: format!("{width:.0}%"),
            question_number: number,
            total_questions: total,
            score: self.engine.score(),
            prompt,
            options,
            feedback,
        })
    }
}

fn is_image_ref(option: &str) -> bool {
    option.ends_with(".png") || option.ends_with(".jpg")
}

fn option_class(phase: &QuizPhase, option: &str) -> &'static str {
    match phase {
        QuizPhase::Feedback { selected, correct } if selected == option => {
            if *correct {
                "option correct"
            } else {
                "option wrong"
            }
        }
        _ => "option",
    }
}
