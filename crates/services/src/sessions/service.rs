use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerRecord, AttemptId, CompletionReason, Question, QuestionId, Quiz, QuizOutcome,
    TimerPolicy,
};

use super::plan::QuizPlan;
use super::progress::QuizProgress;
use super::view::QuizSnapshot;
use crate::error::SessionError;

//
// ─── STATES, ACTIONS, SIGNALS ──────────────────────────────────────────────────
//

/// Where an attempt is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// A question is shown, the timer runs, no answer is locked.
    Presenting,
    /// The answer (or its absence) is locked and shown; the timer is frozen.
    Feedback,
    /// Terminal. Only `retry` is accepted.
    Complete,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizPhase::Presenting => "presenting",
            QuizPhase::Feedback => "showing feedback",
            QuizPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// User-initiated transitions, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    Select,
    Submit,
    Advance,
    Retry,
}

impl fmt::Display for QuizAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizAction::Select => "select an answer",
            QuizAction::Submit => "submit an answer",
            QuizAction::Advance => "advance",
            QuizAction::Retry => "retry",
        };
        f.write_str(name)
    }
}

/// Events for the host to render (celebration, shake, final screen).
///
/// Signals carry no meaning back into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSignal {
    Correct { question_id: QuestionId },
    Incorrect { question_id: QuestionId },
    /// The per-question countdown ran out with nothing selected.
    TimedOut { question_id: QuestionId },
    Completed(QuizOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one quiz attempt.
///
/// Owns the play order, the current question, the tentative or locked answer,
/// the running score and the countdown. All mutation goes through
/// `select_answer`, `submit`, `tick`, `advance` and `retry`; a call that is
/// not valid for the current phase is rejected without touching state.
pub struct QuizSession {
    quiz: Arc<Quiz>,
    clock: Clock,
    attempt_id: AttemptId,
    order: Vec<usize>,
    phase: QuizPhase,
    current: usize,
    selected: Option<usize>,
    score: u32,
    time_remaining: u32,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    /// Start an attempt over the quiz in authored order.
    ///
    /// `clock` only stamps start and completion times; the countdown is tick driven.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz has no questions.
    pub fn new(quiz: Arc<Quiz>, clock: Clock) -> Result<Self, SessionError> {
        let plan = QuizPlan::sequential(quiz.len());
        Self::with_plan(quiz, clock, plan)
    }

    /// Start an attempt with an explicit play order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz or the plan is empty and
    /// `SessionError::InvalidPlan` if `plan` is not a permutation of the
    /// quiz's question indices.
    pub fn with_plan(quiz: Arc<Quiz>, clock: Clock, plan: QuizPlan) -> Result<Self, SessionError> {
        if quiz.is_empty() || plan.is_empty() {
            return Err(SessionError::Empty);
        }
        let order = plan.into_order();
        if !is_permutation(&order, quiz.len()) {
            return Err(SessionError::InvalidPlan {
                len: order.len(),
                expected: quiz.len(),
            });
        }

        let started_at = clock.now();
        let attempt_id = AttemptId::generate();
        let time_remaining = quiz.settings().timer().secs();
        debug!(%attempt_id, quiz_id = %quiz.id(), questions = order.len(), "quiz attempt started");

        Ok(Self {
            quiz,
            clock,
            attempt_id,
            order,
            phase: QuizPhase::Presenting,
            current: 0,
            selected: None,
            score: 0,
            time_remaining,
            answers: Vec::new(),
            started_at,
            outcome: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.order.len()
    }

    /// Play order of this attempt as indices into `quiz().questions()`.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The question on screen. In `Complete` this is the last question reached.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.quiz.questions()[self.order[self.current]]
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    /// True once the current question has been locked and scored.
    #[must_use]
    pub fn answered(&self) -> bool {
        self.phase != QuizPhase::Presenting
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.order.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Final result, available once the attempt is `Complete`.
    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total_questions();
        QuizProgress {
            total,
            answered: self.answers.len(),
            remaining: total.saturating_sub(self.answers.len()),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            attempt_id: self.attempt_id,
            phase: self.phase,
            current_index: self.current,
            total: self.total_questions(),
            question_id: self.current_question().id(),
            time_remaining: self.time_remaining,
            selected_answer: self.selected,
            answered: self.answered(),
            score: self.score,
            is_last: self.is_last_question(),
            progress: self.progress(),
        }
    }

    /// Choose an option for the current question.
    ///
    /// With a per-question timer the choice is locked and scored immediately.
    /// With a whole-session timer it is only tentative until `submit`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Presenting` and
    /// `SessionError::InvalidOption` if `index` is not an option of the current question.
    pub fn select_answer(&mut self, index: usize) -> Result<Option<QuizSignal>, SessionError> {
        self.expect_phase(QuizAction::Select, QuizPhase::Presenting)?;
        let len = self.current_question().option_count();
        if index >= len {
            return Err(SessionError::InvalidOption { index, len });
        }

        self.selected = Some(index);
        match self.quiz.settings().timer() {
            TimerPolicy::PerQuestion { .. } => Ok(Some(self.lock_answer(index))),
            TimerPolicy::WholeSession { .. } => {
                debug!(attempt_id = %self.attempt_id, index, "tentative answer recorded");
                Ok(None)
            }
        }
    }

    /// Lock the tentative choice made with `select_answer`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Presenting` and
    /// `SessionError::NothingSelected` if no option has been chosen.
    pub fn submit(&mut self) -> Result<QuizSignal, SessionError> {
        self.expect_phase(QuizAction::Submit, QuizPhase::Presenting)?;
        let index = self.selected.ok_or(SessionError::NothingSelected)?;
        Ok(self.lock_answer(index))
    }

    /// Count down one second.
    ///
    /// A no-op outside `Presenting`. When the countdown reaches zero a
    /// per-question timer locks the question as unanswered (`TimedOut`), while a
    /// whole-session timer ends the attempt (`Completed`); a tentative,
    /// unsubmitted choice is discarded in both cases.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Outcome` if the final outcome cannot be built.
    pub fn tick(&mut self) -> Result<Option<QuizSignal>, SessionError> {
        if self.phase != QuizPhase::Presenting {
            return Ok(None);
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return Ok(None);
        }

        let question_id = self.current_question().id();
        self.selected = None;
        self.answers.push(AnswerRecord::unanswered(question_id));

        match self.quiz.settings().timer() {
            TimerPolicy::PerQuestion { .. } => {
                self.phase = QuizPhase::Feedback;
                debug!(attempt_id = %self.attempt_id, %question_id, "question timed out");
                Ok(Some(QuizSignal::TimedOut { question_id }))
            }
            TimerPolicy::WholeSession { .. } => {
                let signal = self.complete(CompletionReason::TimeExpired)?;
                Ok(Some(signal))
            }
        }
    }

    /// Move past the feedback for the current question.
    ///
    /// From the last question this completes the attempt and returns
    /// `QuizSignal::Completed`; otherwise the next question is presented.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Feedback`.
    pub fn advance(&mut self) -> Result<Option<QuizSignal>, SessionError> {
        self.expect_phase(QuizAction::Advance, QuizPhase::Feedback)?;

        if self.is_last_question() {
            return self.complete(CompletionReason::Finished).map(Some);
        }

        self.current += 1;
        self.selected = None;
        self.phase = QuizPhase::Presenting;
        if let TimerPolicy::PerQuestion { secs } = self.quiz.settings().timer() {
            self.time_remaining = secs;
        }
        debug!(attempt_id = %self.attempt_id, index = self.current, "advanced to next question");
        Ok(None)
    }

    /// Start over after completion, reshuffling when the quiz settings ask for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the attempt is `Complete`.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        self.expect_phase(QuizAction::Retry, QuizPhase::Complete)?;
        let plan = QuizPlan::build(self.quiz.len(), self.quiz.settings().shuffle_on_retry());
        self.restart(plan);
        Ok(())
    }

    /// Like `retry`, but always shuffles using the given RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the attempt is `Complete`.
    pub fn retry_shuffled<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.expect_phase(QuizAction::Retry, QuizPhase::Complete)?;
        let plan = QuizPlan::shuffled(self.quiz.len(), rng);
        self.restart(plan);
        Ok(())
    }

    fn restart(&mut self, plan: QuizPlan) {
        let previous = self.attempt_id;
        self.attempt_id = AttemptId::generate();
        self.order = plan.into_order();
        self.phase = QuizPhase::Presenting;
        self.current = 0;
        self.selected = None;
        self.score = 0;
        self.time_remaining = self.quiz.settings().timer().secs();
        self.answers.clear();
        self.started_at = self.clock.now();
        self.outcome = None;
        info!(%previous, attempt_id = %self.attempt_id, "quiz attempt restarted");
    }

    fn expect_phase(&self, action: QuizAction, expected: QuizPhase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    fn lock_answer(&mut self, index: usize) -> QuizSignal {
        let question = self.current_question();
        let question_id = question.id();
        let correct = question.is_correct(index);

        if correct {
            self.score += 1;
        }
        self.answers
            .push(AnswerRecord::answered(question_id, index, correct));
        self.phase = QuizPhase::Feedback;
        debug!(attempt_id = %self.attempt_id, %question_id, index, correct, "answer locked");

        if correct {
            QuizSignal::Correct { question_id }
        } else {
            QuizSignal::Incorrect { question_id }
        }
    }

    fn complete(&mut self, reason: CompletionReason) -> Result<QuizSignal, SessionError> {
        // A wall clock that stepped backwards must not invalidate the attempt.
        let completed_at = self.clock.now().max(self.started_at);
        let outcome = QuizOutcome::from_answers(
            self.attempt_id,
            self.total_questions(),
            &self.answers,
            self.quiz.settings(),
            self.started_at,
            completed_at,
            reason,
        )?;

        self.phase = QuizPhase::Complete;
        self.outcome = Some(outcome.clone());
        info!(
            attempt_id = %self.attempt_id,
            score = outcome.score(),
            total = outcome.total(),
            ?reason,
            "quiz attempt complete"
        );
        Ok(QuizSignal::Completed(outcome))
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    order
        .iter()
        .all(|&i| i < len && !std::mem::replace(&mut seen[i], true))
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz.id())
            .field("attempt_id", &self.attempt_id)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("score", &self.score)
            .field("time_remaining", &self.time_remaining)
            .field("answers_len", &self.answers.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, QuizId, QuizSettings};
    use quiz_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_quiz(correct: &[usize], settings: QuizSettings) -> Arc<Quiz> {
        let drafts = correct.iter().enumerate().map(|(i, &answer)| {
            QuestionDraft::new(
                QuestionId::new(i as u64 + 1),
                format!("Q{}", i + 1),
                ["a", "b", "c", "d"],
                answer,
            )
        });
        Arc::new(Quiz::from_drafts(QuizId::new(1), "Test", drafts, settings).unwrap())
    }

    fn per_question(secs: u32) -> QuizSettings {
        QuizSettings::new(TimerPolicy::PerQuestion { secs }, 70, 20, false).unwrap()
    }

    fn whole_session(secs: u32) -> QuizSettings {
        QuizSettings::new(TimerPolicy::WholeSession { secs }, 70, 20, false).unwrap()
    }

    fn session(correct: &[usize], settings: QuizSettings) -> QuizSession {
        QuizSession::new(build_quiz(correct, settings), fixed_clock()).unwrap()
    }

    #[test]
    fn new_session_presents_first_question() {
        let s = session(&[1, 2], per_question(30));
        assert_eq!(s.phase(), QuizPhase::Presenting);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.time_remaining(), 30);
        assert_eq!(s.selected_answer(), None);
        assert!(!s.answered());
        assert_eq!(s.score(), 0);
        assert_eq!(s.started_at(), fixed_now());
    }

    #[test]
    fn correct_selection_scores_and_locks() {
        let mut s = session(&[1, 2], per_question(30));
        let signal = s.select_answer(1).unwrap();
        assert_eq!(
            signal,
            Some(QuizSignal::Correct {
                question_id: QuestionId::new(1)
            })
        );
        assert_eq!(s.phase(), QuizPhase::Feedback);
        assert!(s.answered());
        assert_eq!(s.score(), 1);

        let err = s.select_answer(0).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                action: QuizAction::Select,
                phase: QuizPhase::Feedback
            }
        );
        assert_eq!(s.selected_answer(), Some(1));
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn wrong_selection_signals_incorrect() {
        let mut s = session(&[1], per_question(30));
        let signal = s.select_answer(3).unwrap();
        assert!(matches!(signal, Some(QuizSignal::Incorrect { .. })));
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn out_of_range_selection_is_rejected_without_change() {
        let mut s = session(&[1, 2], per_question(30));
        s.tick().unwrap();
        let before = s.snapshot();

        let err = s.select_answer(5).unwrap_err();
        assert_eq!(err, SessionError::InvalidOption { index: 5, len: 4 });
        assert_eq!(s.snapshot(), before);
        assert!(s.answers().is_empty());
    }

    #[test]
    fn scenario_five_questions_scores_three() {
        let mut s = session(&[1, 2, 2, 0, 2], per_question(30));
        let picks = [1, 0, 2, 0, 1];
        let mut completed = None;
        for pick in picks {
            s.select_answer(pick).unwrap();
            completed = s.advance().unwrap();
        }

        assert!(s.is_complete());
        assert_eq!(s.score(), 3);
        let Some(QuizSignal::Completed(outcome)) = completed else {
            panic!("expected completion signal");
        };
        assert_eq!(outcome.score(), 3);
        assert_eq!(outcome.total(), 5);
        assert_eq!(outcome.completion(), CompletionReason::Finished);
        assert_eq!(s.outcome(), Some(&outcome));
    }

    #[test]
    fn per_question_timeout_locks_unanswered() {
        let mut s = session(&[1, 2], per_question(30));
        for _ in 0..29 {
            assert_eq!(s.tick().unwrap(), None);
        }
        assert_eq!(s.time_remaining(), 1);

        let signal = s.tick().unwrap();
        assert_eq!(
            signal,
            Some(QuizSignal::TimedOut {
                question_id: QuestionId::new(1)
            })
        );
        assert_eq!(s.phase(), QuizPhase::Feedback);
        assert_eq!(s.selected_answer(), None);
        assert_eq!(s.time_remaining(), 0);
        assert_eq!(s.score(), 0);

        assert_eq!(s.advance().unwrap(), None);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.time_remaining(), 30);
        assert_eq!(s.phase(), QuizPhase::Presenting);
    }

    #[test]
    fn tick_outside_presenting_is_a_no_op() {
        let mut s = session(&[0], per_question(5));
        s.select_answer(0).unwrap();
        let frozen = s.snapshot();
        for _ in 0..10 {
            assert_eq!(s.tick().unwrap(), None);
        }
        assert_eq!(s.snapshot(), frozen);

        s.advance().unwrap();
        assert!(s.is_complete());
        let done = s.snapshot();
        assert_eq!(s.tick().unwrap(), None);
        assert_eq!(s.snapshot(), done);
    }

    #[test]
    fn advance_requires_feedback() {
        let mut s = session(&[0, 1], per_question(5));
        let err = s.advance().unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                action: QuizAction::Advance,
                phase: QuizPhase::Presenting
            }
        );
    }

    #[test]
    fn advance_resets_timer_and_selection() {
        let mut s = session(&[0, 1], per_question(10));
        s.tick().unwrap();
        s.tick().unwrap();
        s.select_answer(2).unwrap();
        assert_eq!(s.time_remaining(), 8);

        s.advance().unwrap();
        assert_eq!(s.time_remaining(), 10);
        assert_eq!(s.selected_answer(), None);
        assert!(!s.answered());
        assert!(s.is_last_question());
    }

    #[test]
    fn whole_session_selection_is_tentative_until_submit() {
        let mut s = session(&[2, 1], whole_session(600));
        assert_eq!(s.select_answer(0).unwrap(), None);
        assert_eq!(s.phase(), QuizPhase::Presenting);
        assert_eq!(s.select_answer(2).unwrap(), None);
        assert_eq!(s.selected_answer(), Some(2));
        assert_eq!(s.score(), 0);

        let signal = s.submit().unwrap();
        assert!(matches!(signal, QuizSignal::Correct { .. }));
        assert_eq!(s.score(), 1);
        assert_eq!(s.phase(), QuizPhase::Feedback);
    }

    #[test]
    fn submit_without_selection_is_rejected() {
        let mut s = session(&[2], whole_session(600));
        assert_eq!(s.submit().unwrap_err(), SessionError::NothingSelected);
        assert_eq!(s.phase(), QuizPhase::Presenting);
    }

    #[test]
    fn whole_session_timer_keeps_running_across_questions() {
        let mut s = session(&[0, 0], whole_session(100));
        for _ in 0..40 {
            s.tick().unwrap();
        }
        s.select_answer(0).unwrap();
        s.submit().unwrap();
        s.advance().unwrap();
        assert_eq!(s.time_remaining(), 60);
    }

    #[test]
    fn whole_session_expiry_completes_attempt() {
        let mut s = session(&[0, 1, 2], whole_session(3));
        s.select_answer(0).unwrap();
        s.submit().unwrap();
        s.advance().unwrap();
        s.select_answer(1).unwrap();

        assert_eq!(s.tick().unwrap(), None);
        assert_eq!(s.tick().unwrap(), None);
        let Some(QuizSignal::Completed(outcome)) = s.tick().unwrap() else {
            panic!("expected completion on expiry");
        };

        assert!(s.is_complete());
        assert_eq!(s.selected_answer(), None);
        assert_eq!(outcome.completion(), CompletionReason::TimeExpired);
        assert_eq!(outcome.correct(), 1);
        assert_eq!(outcome.incorrect(), 0);
        assert_eq!(outcome.unanswered(), 2);
        assert_eq!(s.answers().len(), 2);
    }

    #[test]
    fn retry_requires_complete_and_resets_counters() {
        let mut s = session(&[0, 1], per_question(10));
        assert!(matches!(
            s.retry().unwrap_err(),
            SessionError::InvalidTransition {
                action: QuizAction::Retry,
                ..
            }
        ));

        s.select_answer(0).unwrap();
        s.advance().unwrap();
        s.select_answer(1).unwrap();
        s.advance().unwrap();
        assert_eq!(s.score(), 2);
        let first_attempt = s.attempt_id();

        s.retry().unwrap();
        assert_ne!(s.attempt_id(), first_attempt);
        assert_eq!(s.phase(), QuizPhase::Presenting);
        assert_eq!(s.score(), 0);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.time_remaining(), 10);
        assert!(s.answers().is_empty());
        assert!(s.outcome().is_none());
        assert_eq!(s.order(), &[0, 1]);

        s.select_answer(1).unwrap();
        s.advance().unwrap();
        s.select_answer(1).unwrap();
        s.advance().unwrap();
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn shuffled_retry_keeps_question_set_and_scores_by_question() {
        let mut s = session(&[0, 1, 2, 3, 0, 1], per_question(10));
        while !s.is_complete() {
            if s.phase() == QuizPhase::Presenting {
                s.select_answer(0).unwrap();
            }
            s.advance().unwrap();
        }

        let mut rng = StdRng::seed_from_u64(3);
        s.retry_shuffled(&mut rng).unwrap();
        let mut sorted = s.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);

        // Always pick the correct option of whichever question is shown.
        while !s.is_complete() {
            let answer = s.current_question().correct_answer();
            s.select_answer(answer).unwrap();
            s.advance().unwrap();
        }
        assert_eq!(s.score(), 6);
    }

    #[test]
    fn snapshot_and_progress_follow_state() {
        let mut s = session(&[0, 1, 2], per_question(10));
        s.select_answer(0).unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.phase, QuizPhase::Feedback);
        assert!(snap.answered);
        assert_eq!(snap.question_id, QuestionId::new(1));
        assert_eq!(snap.countdown(), "00:10");
        assert!(!snap.is_last);

        let progress = s.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert!((progress.position_ratio(s.current_index()) - 1.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(snap.progress, progress);

        s.advance().unwrap();
        assert!((s.snapshot().position_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_timestamp_uses_clock() {
        let quiz = build_quiz(&[0], per_question(10));
        let mut s = QuizSession::new(quiz, fixed_clock()).unwrap();
        s.select_answer(0).unwrap();
        s.advance().unwrap();
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.started_at(), fixed_now());
        assert_eq!(outcome.completed_at(), fixed_now());
        assert!(outcome.passed());
        assert_eq!(outcome.xp(), 20);
    }

    #[test]
    fn plan_must_cover_every_question() {
        let quiz = build_quiz(&[0, 1], per_question(10));
        let err = QuizSession::with_plan(Arc::clone(&quiz), fixed_clock(), QuizPlan::sequential(3))
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidPlan { len: 3, expected: 2 });

        let err = QuizSession::with_plan(Arc::clone(&quiz), fixed_clock(), QuizPlan::sequential(1))
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidPlan { len: 1, expected: 2 });

        let s = QuizSession::with_plan(quiz, fixed_clock(), QuizPlan::sequential(2)).unwrap();
        assert_eq!(s.order(), &[0, 1]);
    }
}
