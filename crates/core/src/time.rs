use chrono::{DateTime, Utc};

/// Wall-clock source for attempt timestamps.
///
/// The countdown itself is driven by ticks, never by this clock; the clock only
/// stamps `started_at` / `completed_at`.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// System time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Formats a countdown as `mm:ss`, e.g. `600` -> `"10:00"`.
#[must_use]
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whole seconds between two timestamps, clamped to `0..=u32::MAX`.
#[must_use]
pub fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    u32::try_from((to - from).num_seconds().max(0)).unwrap_or(u32::MAX)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn countdown_formats_minutes_and_seconds() {
        assert_eq!(format_countdown(600), "10:00");
        assert_eq!(format_countdown(65), "01:05");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn seconds_between_clamps_negative_spans() {
        let start = fixed_now();
        assert_eq!(whole_seconds_between(start, start + Duration::milliseconds(42_900)), 42);
        assert_eq!(whole_seconds_between(start + Duration::seconds(5), start), 0);
    }

    #[test]
    fn fixed_clock_is_frozen() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.now(), clock.now());
        let later = Clock::fixed(fixed_now() + Duration::seconds(30));
        assert_eq!(whole_seconds_between(clock.now(), later.now()), 30);
    }
}
