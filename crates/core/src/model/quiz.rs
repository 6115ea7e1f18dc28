use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};
use crate::model::question::{Question, QuestionDraft, QuestionError};
use crate::model::settings::QuizSettings;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("a quiz needs at least one question")]
    NoQuestions,

    #[error("question id {id} appears more than once")]
    DuplicateQuestionId { id: QuestionId },

    #[error("invalid question {id}: {source}")]
    Question {
        id: QuestionId,
        #[source]
        source: QuestionError,
    },
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A titled, fixed sequence of questions plus the settings used to play it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
    settings: QuizSettings,
}

impl Quiz {
    /// Creates a quiz from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle`, `QuizError::NoQuestions` or
    /// `QuizError::DuplicateQuestionId`.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
        settings: QuizSettings,
    ) -> Result<Self, QuizError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestionId { id: question.id() });
            }
        }

        Ok(Self {
            id,
            title,
            questions,
            settings,
        })
    }

    /// Validates every draft and builds the quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Question` for the first invalid draft, otherwise the
    /// same errors as [`Quiz::new`].
    pub fn from_drafts(
        id: QuizId,
        title: impl Into<String>,
        drafts: impl IntoIterator<Item = QuestionDraft>,
        settings: QuizSettings,
    ) -> Result<Self, QuizError> {
        let questions = drafts
            .into_iter()
            .map(|draft| {
                let id = draft.id;
                draft
                    .validate()
                    .map_err(|source| QuizError::Question { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(id, title, questions, settings)
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed quiz; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: u64) -> QuestionDraft {
        QuestionDraft::new(QuestionId::new(id), format!("Q{id}"), ["a", "b"], 0)
    }

    #[test]
    fn quiz_requires_questions() {
        let err = Quiz::new(QuizId::new(1), "Empty", Vec::new(), QuizSettings::practice())
            .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn quiz_requires_title() {
        let err = Quiz::from_drafts(QuizId::new(1), "  ", [draft(1)], QuizSettings::practice())
            .unwrap_err();
        assert_eq!(err, QuizError::EmptyTitle);
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let err = Quiz::from_drafts(
            QuizId::new(1),
            "Dupes",
            [draft(1), draft(2), draft(1)],
            QuizSettings::practice(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizError::DuplicateQuestionId {
                id: QuestionId::new(1)
            }
        );
    }

    #[test]
    fn invalid_draft_reports_its_id() {
        let mut bad = draft(2);
        bad.correct_answer = 9;
        let err = Quiz::from_drafts(
            QuizId::new(1),
            "Bad",
            [draft(1), bad],
            QuizSettings::practice(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QuizError::Question {
                id,
                source: QuestionError::CorrectAnswerOutOfRange { index: 9, len: 2 },
            } if id == QuestionId::new(2)
        ));
    }

    #[test]
    fn valid_quiz_keeps_order() {
        let quiz = Quiz::from_drafts(
            QuizId::new(3),
            " Basics ",
            [draft(5), draft(4)],
            QuizSettings::timed_exam(),
        )
        .unwrap();
        assert_eq!(quiz.title(), "Basics");
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions()[0].id(), QuestionId::new(5));
        assert!(!quiz.settings().timer().is_per_question());
    }
}
