//! File and command-line configuration for the `quiz` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quiz_core::model::{QuizSettings, SettingsError, TimerPolicy};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "QUIZ_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    PerQuestion,
    WholeSession,
}

/// `[timer]` table; either key may be left out to keep the quiz preset's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimerConfig {
    pub mode: Option<TimerMode>,
    pub seconds: Option<u32>,
}

/// Optional overrides on top of a quiz's built-in settings.
///
/// Every field is optional; unset fields keep the quiz preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
    /// Built-in quiz slug to play.
    pub quiz: Option<String>,
    pub timer: Option<TimerConfig>,
    pub pass_threshold_percent: Option<u8>,
    pub xp_per_correct: Option<u32>,
    pub shuffle_on_retry: Option<bool>,
    /// Shuffle the first attempt too.
    pub shuffle: Option<bool>,
    /// Milliseconds per countdown tick.
    pub tick_millis: Option<u64>,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub quiz: Option<String>,
    pub timer_mode: Option<TimerMode>,
    pub seconds: Option<u32>,
    pub shuffle: bool,
    pub tick_millis: Option<u64>,
}

impl QuizConfig {
    /// Load and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if `raw` is not valid config TOML.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load the file named by `--config` or `QUIZ_CONFIG`, or defaults when neither is set.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading quiz config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Fold command-line values over the file values.
    #[must_use]
    pub fn with_overrides(mut self, cli: &CliOverrides) -> Self {
        if cli.quiz.is_some() {
            self.quiz.clone_from(&cli.quiz);
        }
        if cli.shuffle {
            self.shuffle = Some(true);
        }
        if cli.tick_millis.is_some() {
            self.tick_millis = cli.tick_millis;
        }
        if cli.timer_mode.is_some() || cli.seconds.is_some() {
            let mut timer = self.timer.unwrap_or_default();
            timer.mode = cli.timer_mode.or(timer.mode);
            timer.seconds = cli.seconds.or(timer.seconds);
            self.timer = Some(timer);
        }
        self
    }

    /// Settings for a quiz whose preset is `base`, with this config applied.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the merged values are out of range.
    pub fn settings_for(&self, base: &QuizSettings) -> Result<QuizSettings, SettingsError> {
        let timer = self.timer.unwrap_or_default();
        let secs = timer.seconds.unwrap_or(base.timer().secs());
        let per_question = timer
            .mode
            .map_or(base.timer().is_per_question(), |mode| mode == TimerMode::PerQuestion);
        let timer = if per_question {
            TimerPolicy::PerQuestion { secs }
        } else {
            TimerPolicy::WholeSession { secs }
        };

        QuizSettings::new(
            timer,
            self.pass_threshold_percent
                .unwrap_or(base.pass_threshold_percent()),
            self.xp_per_correct.unwrap_or(base.xp_per_correct()),
            self.shuffle_on_retry.unwrap_or(base.shuffle_on_retry()),
        )
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle.unwrap_or(false)
    }
}
