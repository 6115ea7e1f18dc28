mod config;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quiz_core::catalog;
use quiz_core::model::{Quiz, TimerPolicy};
use services::{Clock, QuizRunner};

use crate::config::{CliOverrides, QuizConfig, TimerMode};

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Timed multiple-choice quizzes in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the built-in quizzes.
    List,
    /// Play a quiz interactively.
    Play(PlayArgs),
}

#[derive(Debug, clap::Args)]
struct PlayArgs {
    /// Quiz slug (see `quiz list`).
    #[arg(long)]
    quiz: Option<String>,
    /// TOML config file; falls back to `QUIZ_CONFIG`.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    timer: Option<TimerMode>,
    /// Countdown budget in seconds.
    #[arg(long)]
    seconds: Option<u32>,
    /// Shuffle question order.
    #[arg(long)]
    shuffle: bool,
    /// Length of one countdown tick in milliseconds.
    #[arg(long)]
    tick_millis: Option<u64>,
    /// Print the final outcome as JSON on exit.
    #[arg(long)]
    json: bool,
}

impl PlayArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            quiz: self.quiz.clone(),
            timer_mode: self.timer,
            seconds: self.seconds,
            shuffle: self.shuffle,
            tick_millis: self.tick_millis,
        }
    }
}

fn describe_timer(timer: TimerPolicy) -> String {
    match timer {
        TimerPolicy::PerQuestion { secs } => format!("{secs}s per question"),
        TimerPolicy::WholeSession { secs } => format!("{secs}s total"),
    }
}

fn list() -> Result<()> {
    for slug in catalog::SLUGS {
        let quiz = load_quiz(slug)?;
        println!(
            "{slug:<20} {} ({} questions, {})",
            quiz.title(),
            quiz.len(),
            describe_timer(quiz.settings().timer())
        );
    }
    Ok(())
}

fn load_quiz(slug: &str) -> Result<Quiz> {
    catalog::load(slug).map_err(|err| match err {
        unknown @ quiz_core::Error::UnknownQuiz { .. } => anyhow!("{unknown} (try `quiz list`)"),
        other => anyhow::Error::new(other).context(format!("built-in quiz '{slug}' is invalid")),
    })
}

async fn play(args: PlayArgs) -> Result<()> {
    let config = QuizConfig::discover(args.config.as_deref())?.with_overrides(&args.overrides());
    let slug = config.quiz.as_deref().unwrap_or(catalog::JS_BASICS);
    let quiz = load_quiz(slug)?;
    let settings = config
        .settings_for(quiz.settings())
        .context("invalid quiz settings")?;
    let quiz = Arc::new(quiz.with_settings(settings));

    let mut runner = QuizRunner::new(Clock::default_clock()).with_shuffle(config.shuffle());
    if let Some(millis) = config.tick_millis {
        runner = runner.with_tick_period(Duration::from_millis(millis));
    }
    tracing::info!(quiz = slug, timer = ?quiz.settings().timer(), "starting quiz");

    let (handle, updates) = runner.start(Arc::clone(&quiz))?;
    let outcome = terminal::play(quiz, handle, updates).await?;

    if args.json {
        match outcome {
            Some(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
            None => println!("null"),
        }
    }
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::List => list(),
        Command::Play(args) => play(args).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(2);
    }
}
