use quiz_core::model::{AttemptId, QuestionId};
use quiz_core::time::format_countdown;

use super::progress::QuizProgress;
use super::service::QuizPhase;

/// Presentation-agnostic snapshot of a quiz attempt.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings beyond the countdown helper
/// - no question text (hosts look it up by `question_id`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub attempt_id: AttemptId,
    pub phase: QuizPhase,
    pub current_index: usize,
    pub total: usize,
    pub question_id: QuestionId,
    pub time_remaining: u32,
    pub selected_answer: Option<usize>,
    pub answered: bool,
    pub score: u32,
    pub is_last: bool,
    pub progress: QuizProgress,
}

impl QuizSnapshot {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    /// Fraction of the attempt reached, counting the question on screen.
    #[must_use]
    pub fn position_ratio(&self) -> f64 {
        self.progress.position_ratio(self.current_index)
    }

    /// Remaining time as `mm:ss`.
    #[must_use]
    pub fn countdown(&self) -> String {
        format_countdown(self.time_remaining)
    }
}
