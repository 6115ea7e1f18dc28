//! Built-in quizzes bundled with the engine.

use crate::Error;
use crate::model::{QuestionDraft, QuestionId, Quiz, QuizError, QuizId, QuizSettings};

pub const JS_BASICS: &str = "js-basics";
pub const MIXED_FUNDAMENTALS: &str = "mixed-fundamentals";

/// Slugs of every built-in quiz, in display order.
pub const SLUGS: [&str; 2] = [JS_BASICS, MIXED_FUNDAMENTALS];

/// Looks up a built-in quiz by slug.
///
/// Returns `None` for an unknown slug.
///
/// # Errors
///
/// Returns `QuizError` if the bundled data fails validation.
pub fn find(slug: &str) -> Option<Result<Quiz, QuizError>> {
    match slug {
        JS_BASICS => Some(js_basics()),
        MIXED_FUNDAMENTALS => Some(mixed_fundamentals()),
        _ => None,
    }
}

/// Like `find`, but an unknown slug is an error.
///
/// # Errors
///
/// Returns `Error::UnknownQuiz` for an unregistered slug and `Error::Quiz` if
/// the bundled data fails validation.
pub fn load(slug: &str) -> Result<Quiz, Error> {
    let quiz = find(slug).ok_or_else(|| Error::UnknownQuiz {
        slug: slug.to_owned(),
    })??;
    Ok(quiz)
}

/// JavaScript basics, played with the practice preset (30s per question).
///
/// # Errors
///
/// Returns `QuizError` if the bundled data fails validation.
pub fn js_basics() -> Result<Quiz, QuizError> {
    let q = |id: u64, prompt: &str, options: [&str; 4], correct: usize, why: &str| {
        QuestionDraft::new(QuestionId::new(id), prompt, options, correct).with_explanation(why)
    };

    Quiz::from_drafts(
        QuizId::new(1),
        "JavaScript Basics Quiz",
        [
            q(
                1,
                "What is the correct way to declare a variable in JavaScript?",
                ["variable x = 5", "let x = 5", "v x = 5", "dim x = 5"],
                1,
                "Modern JavaScript declares variables with \"let\" or \"const\"; \"let\" is for values that might change.",
            ),
            q(
                2,
                "Which symbol is used for single-line comments in JavaScript?",
                ["<!-- -->", "/* */", "//", "#"],
                2,
                "Single-line comments start with //. Multi-line comments use /* */.",
            ),
            q(
                3,
                "What does \"===\" mean in JavaScript?",
                [
                    "Assignment operator",
                    "Strict equality (checks value and type)",
                    "Loose equality (checks only value)",
                    "Not equal",
                ],
                1,
                "=== compares both value and type, while == only compares value.",
            ),
            q(
                4,
                "What is the result of: typeof null",
                ["\"null\"", "\"undefined\"", "\"object\"", "\"number\""],
                2,
                "typeof null returns \"object\", a long-standing quirk kept for backward compatibility.",
            ),
            q(
                5,
                "Which method is used to add an element to the end of an array?",
                ["array.add()", "array.append()", "array.push()", "array.insert()"],
                2,
                "push() appends one or more elements and returns the new length.",
            ),
        ],
        QuizSettings::practice(),
    )
}

/// Mixed programming fundamentals, played with the exam preset (10 minutes total).
///
/// # Errors
///
/// Returns `QuizError` if the bundled data fails validation.
pub fn mixed_fundamentals() -> Result<Quiz, QuizError> {
    let q = |id: u64, prompt: &str, options: [&str; 4], correct: usize| {
        QuestionDraft::new(QuestionId::new(id), prompt, options, correct)
    };

    Quiz::from_drafts(
        QuizId::new(2),
        "Programming Fundamentals",
        [
            q(
                1,
                "What is the correct syntax to output \"Hello World\" in Python?",
                [
                    "echo \"Hello World\"",
                    "print(\"Hello World\")",
                    "console.log(\"Hello World\")",
                    "printf(\"Hello World\")",
                ],
                1,
            ),
            q(
                2,
                "Which data type is used to store True or False values?",
                ["String", "Integer", "Boolean", "Float"],
                2,
            ),
            q(
                3,
                "What does CSS stand for?",
                [
                    "Computer Style Sheets",
                    "Creative Style Sheets",
                    "Cascading Style Sheets",
                    "Colorful Style Sheets",
                ],
                2,
            ),
            q(
                4,
                "Which symbol is used for single-line comments in JavaScript?",
                ["//", "#", "/*", "--"],
                0,
            ),
            q(
                5,
                "What is the time complexity of binary search?",
                ["O(n)", "O(log n)", "O(n²)", "O(1)"],
                1,
            ),
        ],
        QuizSettings::timed_exam(),
    )
}
