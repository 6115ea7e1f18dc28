use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("timer seconds must be between 1 and 3600")]
    InvalidTimerSeconds,

    #[error("pass threshold must be between 1 and 100 percent")]
    InvalidPassThreshold,
}

//
// ─── TIMER POLICY ──────────────────────────────────────────────────────────────
//

/// How the countdown budget is applied to a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPolicy {
    /// Every question gets `secs`; expiry locks the question as unanswered.
    PerQuestion { secs: u32 },
    /// One countdown of `secs` for the whole attempt; expiry ends the attempt.
    WholeSession { secs: u32 },
}

impl TimerPolicy {
    pub const MAX_SECS: u32 = 3600;

    #[must_use]
    pub fn secs(self) -> u32 {
        match self {
            TimerPolicy::PerQuestion { secs } | TimerPolicy::WholeSession { secs } => secs,
        }
    }

    #[must_use]
    pub fn is_per_question(self) -> bool {
        matches!(self, TimerPolicy::PerQuestion { .. })
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for a quiz attempt.
///
/// Controls the countdown, the pass mark and the experience awarded per
/// correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    timer: TimerPolicy,
    pass_threshold_percent: u8,
    xp_per_correct: u32,
    shuffle_on_retry: bool,
}

impl QuizSettings {
    pub const DEFAULT_PASS_THRESHOLD: u8 = 70;
    pub const DEFAULT_XP_PER_CORRECT: u32 = 20;

    /// Practice preset: 30 seconds per question, auto-locked on expiry.
    #[must_use]
    pub fn practice() -> Self {
        Self {
            timer: TimerPolicy::PerQuestion { secs: 30 },
            pass_threshold_percent: Self::DEFAULT_PASS_THRESHOLD,
            xp_per_correct: Self::DEFAULT_XP_PER_CORRECT,
            shuffle_on_retry: false,
        }
    }

    /// Exam preset: a single 10 minute countdown for the whole quiz.
    #[must_use]
    pub fn timed_exam() -> Self {
        Self {
            timer: TimerPolicy::WholeSession { secs: 600 },
            ..Self::practice()
        }
    }

    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimerSeconds` if the timer budget is zero or
    /// above an hour, and `SettingsError::InvalidPassThreshold` if the threshold
    /// is outside `1..=100`.
    pub fn new(
        timer: TimerPolicy,
        pass_threshold_percent: u8,
        xp_per_correct: u32,
        shuffle_on_retry: bool,
    ) -> Result<Self, SettingsError> {
        if !(1..=TimerPolicy::MAX_SECS).contains(&timer.secs()) {
            return Err(SettingsError::InvalidTimerSeconds);
        }
        if !(1..=100).contains(&pass_threshold_percent) {
            return Err(SettingsError::InvalidPassThreshold);
        }

        Ok(Self {
            timer,
            pass_threshold_percent,
            xp_per_correct,
            shuffle_on_retry,
        })
    }

    #[must_use]
    pub fn timer(&self) -> TimerPolicy {
        self.timer
    }

    #[must_use]
    pub fn pass_threshold_percent(&self) -> u8 {
        self.pass_threshold_percent
    }

    #[must_use]
    pub fn xp_per_correct(&self) -> u32 {
        self.xp_per_correct
    }

    #[must_use]
    pub fn shuffle_on_retry(&self) -> bool {
        self.shuffle_on_retry
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::practice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_the_two_quiz_variants() {
        assert_eq!(
            QuizSettings::practice().timer(),
            TimerPolicy::PerQuestion { secs: 30 }
        );
        assert_eq!(
            QuizSettings::timed_exam().timer(),
            TimerPolicy::WholeSession { secs: 600 }
        );
        assert_eq!(QuizSettings::timed_exam().pass_threshold_percent(), 70);
    }

    #[test]
    fn zero_second_timer_is_rejected() {
        let err = QuizSettings::new(TimerPolicy::PerQuestion { secs: 0 }, 70, 20, false)
            .unwrap_err();
        assert_eq!(err, SettingsError::InvalidTimerSeconds);
    }

    #[test]
    fn timer_above_an_hour_is_rejected() {
        let err = QuizSettings::new(TimerPolicy::WholeSession { secs: 3601 }, 70, 20, false)
            .unwrap_err();
        assert_eq!(err, SettingsError::InvalidTimerSeconds);
    }

    #[test]
    fn pass_threshold_bounds() {
        let timer = TimerPolicy::PerQuestion { secs: 10 };
        assert_eq!(
            QuizSettings::new(timer, 0, 20, false).unwrap_err(),
            SettingsError::InvalidPassThreshold
        );
        assert_eq!(
            QuizSettings::new(timer, 101, 20, false).unwrap_err(),
            SettingsError::InvalidPassThreshold
        );
        assert!(QuizSettings::new(timer, 100, 0, true).is_ok());
    }
}
