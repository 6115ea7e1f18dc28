use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question input, as authored in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

impl QuestionDraft {
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_answer: usize,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answer,
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Validates the draft into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or an option is blank, if fewer than
    /// two options are given, or if `correct_answer` does not index into `options`.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if self.correct_answer >= self.options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: self.correct_answer,
                len: self.options.len(),
            });
        }

        let explanation = self
            .explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation,
        })
    }
}

/// A multiple-choice question whose correct answer is always a valid option index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(correct: usize) -> QuestionDraft {
        QuestionDraft::new(QuestionId::new(1), "2 + 2?", ["3", "4", "5", "22"], correct)
    }

    #[test]
    fn valid_draft_builds_question() {
        let q = draft(1).with_explanation("basic arithmetic").validate().unwrap();
        assert_eq!(q.id(), QuestionId::new(1));
        assert_eq!(q.option_count(), 4);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert_eq!(q.explanation(), Some("basic arithmetic"));
    }

    #[test]
    fn correct_answer_must_be_in_bounds() {
        let err = draft(4).validate().unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerOutOfRange { index: 4, len: 4 });
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut d = draft(0);
        d.prompt = "   ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyPrompt);
    }

    #[test]
    fn needs_two_options() {
        let d = QuestionDraft::new(QuestionId::new(1), "only one?", ["yes"], 0);
        assert_eq!(d.validate().unwrap_err(), QuestionError::TooFewOptions { len: 1 });

        let empty = QuestionDraft::new(QuestionId::new(2), "none?", Vec::<String>::new(), 0);
        assert_eq!(
            empty.validate().unwrap_err(),
            QuestionError::TooFewOptions { len: 0 }
        );
    }

    #[test]
    fn blank_option_is_rejected() {
        let d = QuestionDraft::new(QuestionId::new(1), "pick", ["a", " ", "c"], 0);
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = draft(1).with_explanation("  ").validate().unwrap();
        assert_eq!(q.explanation(), None);
    }
}
