//! Line-oriented terminal host for a running quiz.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc::UnboundedReceiver;

use quiz_core::model::{CompletionReason, Question, Quiz, QuizOutcome};
use quiz_core::time::format_countdown;
use services::{QuizHandle, QuizPhase, QuizSignal, QuizSnapshot, QuizUpdate, RunnerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Zero-based option index.
    Choose(usize),
    Submit,
    Next,
    Retry,
    Quit,
    Help,
}

/// Parse one line of user input. Options are entered 1-based.
#[must_use]
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "n" | "next" => Some(Input::Next),
        "s" | "submit" => Some(Input::Submit),
        "r" | "retry" => Some(Input::Retry),
        "q" | "quit" | "exit" => Some(Input::Quit),
        "?" | "h" | "help" => Some(Input::Help),
        other => other
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(Input::Choose),
    }
}

const HELP: &str = "1-9 choose an option · s submit · enter/n next · r retry · q quit";

/// Question screen: progress, countdown, prompt and numbered options.
#[must_use]
pub fn render_question(question: &Question, snapshot: &QuizSnapshot, whole_session: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {}/{} {}  ⏱ {}{}",
        snapshot.current_index + 1,
        snapshot.total,
        progress_bar(snapshot.position_ratio()),
        format_countdown(snapshot.time_remaining),
        if whole_session { " total" } else { "" }
    );
    let _ = writeln!(out, "{}", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        let _ = writeln!(out, "  {}) {option}", i + 1);
    }
    out
}

const BAR_WIDTH: usize = 10;

fn progress_bar(ratio: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Feedback shown after an answer is locked or the question timed out.
#[must_use]
pub fn render_feedback(question: &Question, signal: &QuizSignal, is_last: bool) -> String {
    let mut out = String::new();
    let answer = &question.options()[question.correct_answer()];
    match signal {
        QuizSignal::Correct { .. } => {
            let _ = writeln!(out, "✔ Correct!");
        }
        QuizSignal::Incorrect { .. } => {
            let _ = writeln!(out, "✘ Incorrect. The answer is: {answer}");
        }
        QuizSignal::TimedOut { .. } => {
            let _ = writeln!(out, "⏰ Time's up! The answer is: {answer}");
        }
        QuizSignal::Completed(_) => return out,
    }
    if let Some(explanation) = question.explanation() {
        let _ = writeln!(out, "  {explanation}");
    }
    let next = if is_last { "finish the quiz" } else { "next question" };
    let _ = writeln!(out, "Press enter for the {next}.");
    out
}

/// Final results screen.
#[must_use]
pub fn render_outcome(title: &str, outcome: &QuizOutcome) -> String {
    let mut out = String::new();
    let headline = if outcome.passed() {
        "Congratulations! 🎉"
    } else {
        "Good try! 💪"
    };
    let _ = writeln!(out, "\n{title}: {headline}");
    if outcome.completion() == CompletionReason::TimeExpired {
        let _ = writeln!(out, "Time ran out before the last question.");
    }
    let _ = writeln!(
        out,
        "You scored {} out of {} ({}%)",
        outcome.score(),
        outcome.total(),
        outcome.percentage()
    );
    let _ = writeln!(
        out,
        "Correct {} · Incorrect {} · Unanswered {} · +{} XP",
        outcome.correct(),
        outcome.incorrect(),
        outcome.unanswered(),
        outcome.xp()
    );
    let stars: String = (0..QuizOutcome::MAX_STARS)
        .map(|i| if i < outcome.stars() { '★' } else { '☆' })
        .collect();
    let _ = writeln!(
        out,
        "{stars}   time {}",
        format_countdown(outcome.elapsed_secs())
    );
    let _ = writeln!(out, "Press r to try again or q to quit.");
    out
}

/// Countdown lines are printed every ten seconds and for the last five.
fn should_announce(seconds: u32) -> bool {
    seconds > 0 && (seconds <= 5 || seconds % 10 == 0)
}

struct Screen {
    quiz: Arc<Quiz>,
    stdout: Stdout,
}

impl Screen {
    async fn print(&mut self, text: &str) -> Result<()> {
        self.stdout.write_all(text.as_bytes()).await?;
        self.stdout.flush().await?;
        Ok(())
    }

    fn question_for(&self, snapshot: &QuizSnapshot) -> Option<&Question> {
        self.quiz
            .questions()
            .iter()
            .find(|q| q.id() == snapshot.question_id)
    }

    async fn show_question(&mut self, snapshot: &QuizSnapshot) -> Result<()> {
        let whole_session = !self.quiz.settings().timer().is_per_question();
        let text = self
            .question_for(snapshot)
            .map(|q| render_question(q, snapshot, whole_session))
            .unwrap_or_default();
        self.print(&text).await
    }

    async fn show_update(&mut self, update: &QuizUpdate, last: &mut (QuizPhase, usize)) -> Result<()> {
        let snapshot = &update.snapshot;
        match &update.signal {
            Some(QuizSignal::Completed(outcome)) => {
                let text = render_outcome(self.quiz.title(), outcome);
                self.print(&text).await?;
            }
            Some(signal) => {
                let text = self
                    .question_for(snapshot)
                    .map(|q| render_feedback(q, signal, snapshot.is_last))
                    .unwrap_or_default();
                self.print(&text).await?;
            }
            None => {
                let entered_question = snapshot.phase == QuizPhase::Presenting
                    && (last.0 != QuizPhase::Presenting || last.1 != snapshot.current_index);
                if entered_question {
                    self.show_question(snapshot).await?;
                } else if snapshot.phase == QuizPhase::Presenting
                    && should_announce(snapshot.time_remaining)
                {
                    let line = format!("  ⏱ {}\n", format_countdown(snapshot.time_remaining));
                    self.print(&line).await?;
                }
            }
        }
        *last = (snapshot.phase, snapshot.current_index);
        Ok(())
    }
}

/// Play until the user quits or stdin closes; returns the final outcome, if any.
///
/// # Errors
///
/// Returns an error if stdin/stdout fail or the runner stops unexpectedly.
pub async fn play(
    quiz: Arc<Quiz>,
    handle: QuizHandle,
    mut updates: UnboundedReceiver<QuizUpdate>,
) -> Result<Option<QuizOutcome>> {
    let mut screen = Screen {
        quiz,
        stdout: tokio::io::stdout(),
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let first = handle.snapshot();
    screen.print(&format!("{}\n{HELP}\n", screen.quiz.title())).await?;
    screen.show_question(&first).await?;
    let mut last = (first.phase, first.current_index);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                let Some(input) = parse_input(&line) else {
                    screen.print(&format!("{HELP}\n")).await?;
                    continue;
                };
                let result = match input {
                    Input::Quit => break,
                    Input::Help => {
                        screen.print(&format!("{HELP}\n")).await?;
                        continue;
                    }
                    Input::Choose(index) => handle.select(index).await.map(|_| ()),
                    Input::Submit => handle.submit().await.map(|_| ()),
                    Input::Next => handle.advance().await.map(|_| ()),
                    Input::Retry => handle.retry().await,
                };
                match result {
                    Ok(()) => {}
                    Err(RunnerError::Session(err)) => screen.print(&format!("  {err}\n")).await?,
                    Err(err) => return Err(err.into()),
                }
            }
            update = updates.recv() => {
                let Some(update) = update else { break };
                screen.show_update(&update, &mut last).await?;
            }
        }
    }

    // Render anything published by the last command before tearing down.
    while let Ok(update) = updates.try_recv() {
        screen.show_update(&update, &mut last).await?;
    }

    let session = handle.shutdown().await?;
    Ok(session.outcome().cloned())
}
