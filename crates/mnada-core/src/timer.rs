//! Countdown and clock helpers for the dashboard timers.
//!
//! The timers themselves are driven by the UI loop; this module only turns a
//! point in time into display text.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

/// Cadence of both dashboard timers.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

const SECONDS_PER_DAY: i64 = 86_400;

/// Time remaining until an auction closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    ends_at: DateTime<Utc>,
}

impl Countdown {
    pub fn new(ends_at: DateTime<Utc>) -> Self {
        Self { ends_at }
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Whole seconds left, or `None` once the end time has passed.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        let secs = (self.ends_at - now).num_seconds();
        (secs > 0).then_some(secs)
    }

    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now).is_none()
    }

    /// `Nd HH:MM:SS` when a day or more remains, `HH:MM:SS` otherwise, `Ended` after close.
    pub fn display(&self, now: DateTime<Utc>) -> String {
        match self.remaining_secs(now) {
            Some(secs) => format_remaining(secs),
            None => "Ended".to_string(),
        }
    }
}

fn format_remaining(total_secs: i64) -> String {
    let days = total_secs / SECONDS_PER_DAY;
    let rest = total_secs % SECONDS_PER_DAY;
    let hours = rest / 3600;
    let minutes = (rest % 3600) / 60;
    let seconds = rest % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Clock line for the auctioneer dashboard, in local time.
pub fn clock_display(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local).format("%a %b %e %Y %H:%M:%S").to_string()
}
