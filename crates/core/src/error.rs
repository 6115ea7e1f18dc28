use thiserror::Error;

use crate::model::{OutcomeError, QuestionError, QuizError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown quiz '{slug}'")]
    UnknownQuiz { slug: String },
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Outcome(#[from] OutcomeError),
}
