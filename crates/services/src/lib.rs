#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{RunnerError, SessionError};

pub use sessions::{
    QuizAction, QuizHandle, QuizPhase, QuizPlan, QuizProgress, QuizRunner, QuizSession,
    QuizSignal, QuizSnapshot, QuizUpdate,
};
