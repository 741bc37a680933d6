mod catalog_vm;
mod quiz_vm;

pub use catalog_vm::{ChallengeCardVm, map_catalog_cards};
pub use quiz_vm::{OptionVm, PromptVm, QuestionVm, QuizVm, RunSnapshot, SummaryVm};
