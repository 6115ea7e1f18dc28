mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use plan::QuizPlan;
pub use progress::QuizProgress;
pub use service::{QuizAction, QuizPhase, QuizSession, QuizSignal};
pub use view::QuizSnapshot;
pub use workflow::{QuizHandle, QuizRunner, QuizUpdate};
