use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{AttemptId, QuestionId, QuizSettings};
use crate::time::whole_seconds_between;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutcomeError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("{answers} answers recorded for a quiz of {total} questions")]
    TooManyAnswers { answers: usize, total: usize },

    #[error("correct ({correct}) + incorrect ({incorrect}) + unanswered ({unanswered}) != total ({total})")]
    CountMismatch {
        total: u32,
        correct: u32,
        incorrect: u32,
        unanswered: u32,
    },
}

/// Why an attempt reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The last question was answered and advanced past.
    Finished,
    /// A whole-session countdown ran out before the last question.
    TimeExpired,
}

/// What happened to a single question during an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// `None` when the question timed out or was never answered.
    pub selected: Option<usize>,
    pub correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn answered(question_id: QuestionId, selected: usize, correct: bool) -> Self {
        Self {
            question_id,
            selected: Some(selected),
            correct,
        }
    }

    #[must_use]
    pub fn unanswered(question_id: QuestionId) -> Self {
        Self {
            question_id,
            selected: None,
            correct: false,
        }
    }
}

/// Final result of a completed quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    attempt_id: AttemptId,
    total: u32,
    correct: u32,
    incorrect: u32,
    unanswered: u32,
    percentage: u8,
    passed: bool,
    xp: u32,
    stars: u8,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    completion: CompletionReason,
}

impl QuizOutcome {
    pub const MAX_STARS: u8 = 5;

    /// Build an outcome from the per-question answer records of an attempt.
    ///
    /// Questions without a record count as unanswered.
    ///
    /// # Errors
    ///
    /// Returns `OutcomeError::EmptyQuiz` for `total == 0`,
    /// `OutcomeError::TooManyAnswers` if more records than questions are given,
    /// and `OutcomeError::InvalidTimeRange` if `completed_at < started_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_answers(
        attempt_id: AttemptId,
        total: usize,
        answers: &[AnswerRecord],
        settings: &QuizSettings,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        completion: CompletionReason,
    ) -> Result<Self, OutcomeError> {
        if total == 0 {
            return Err(OutcomeError::EmptyQuiz);
        }
        if answers.len() > total {
            return Err(OutcomeError::TooManyAnswers {
                answers: answers.len(),
                total,
            });
        }
        let total_u32 = u32::try_from(total).map_err(|_| OutcomeError::TooManyAnswers {
            answers: answers.len(),
            total,
        })?;

        let mut correct = 0_u32;
        let mut incorrect = 0_u32;
        for record in answers {
            match (record.selected, record.correct) {
                (Some(_), true) => correct = correct.saturating_add(1),
                (Some(_), false) => incorrect = incorrect.saturating_add(1),
                (None, _) => {}
            }
        }
        let unanswered = total_u32 - correct - incorrect;

        Self::from_counts(
            attempt_id,
            total_u32,
            correct,
            incorrect,
            unanswered,
            settings,
            started_at,
            completed_at,
            completion,
        )
    }

    /// Build an outcome from raw counts, deriving percentage, pass, xp and stars.
    ///
    /// # Errors
    ///
    /// Returns `OutcomeError::CountMismatch` if the counts do not add up to `total`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_counts(
        attempt_id: AttemptId,
        total: u32,
        correct: u32,
        incorrect: u32,
        unanswered: u32,
        settings: &QuizSettings,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        completion: CompletionReason,
    ) -> Result<Self, OutcomeError> {
        if completed_at < started_at {
            return Err(OutcomeError::InvalidTimeRange);
        }
        if total == 0 {
            return Err(OutcomeError::EmptyQuiz);
        }
        let sum = u64::from(correct) + u64::from(incorrect) + u64::from(unanswered);
        if sum != u64::from(total) {
            return Err(OutcomeError::CountMismatch {
                total,
                correct,
                incorrect,
                unanswered,
            });
        }

        let ratio = f64::from(correct) / f64::from(total);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percentage = (ratio * 100.0).round() as u8;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stars = ((ratio * 100.0) / 20.0).floor() as u8;
        let passed =
            u64::from(correct) * 100 >= u64::from(settings.pass_threshold_percent()) * u64::from(total);

        Ok(Self {
            attempt_id,
            total,
            correct,
            incorrect,
            unanswered,
            percentage,
            passed,
            xp: correct.saturating_mul(settings.xp_per_correct()),
            stars: stars.min(Self::MAX_STARS),
            started_at,
            completed_at,
            completion,
        })
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    /// Number of correct answers; identical to `correct()`.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    #[must_use]
    pub fn stars(&self) -> u8 {
        self.stars
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn completion(&self) -> CompletionReason {
        self.completion
    }

    /// Wall-clock seconds the attempt took.
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        whole_seconds_between(self.started_at, self.completed_at)
    }
}
