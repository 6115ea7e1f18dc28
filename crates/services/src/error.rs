//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::OutcomeError;

use crate::sessions::{QuizAction, QuizPhase};

/// Errors emitted by `QuizSession` transitions.
///
/// A transition that returns an error never mutates the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: QuizAction, phase: QuizPhase },
    #[error("option {index} is out of range for {len} options")]
    InvalidOption { index: usize, len: usize },
    #[error("play order of {len} entries is not a permutation of {expected} questions")]
    InvalidPlan { len: usize, expected: usize },
    #[error("no answer selected to submit")]
    NothingSelected,
    #[error(transparent)]
    Outcome(#[from] OutcomeError),
}

/// Errors emitted by `QuizHandle` when talking to a running quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("quiz runner has stopped")]
    Stopped,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("quiz runner task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
