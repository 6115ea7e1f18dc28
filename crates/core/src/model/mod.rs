mod ids;
mod outcome;
mod question;
mod quiz;
mod settings;

pub use ids::{AttemptId, ParseIdError, QuestionId, QuizId};

pub use outcome::{AnswerRecord, CompletionReason, OutcomeError, QuizOutcome};
pub use question::{Question, QuestionDraft, QuestionError};
pub use quiz::{Quiz, QuizError};
pub use settings::{QuizSettings, SettingsError, TimerPolicy};
