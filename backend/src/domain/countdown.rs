//! Countdown derived from a round's shared anchor.
//!
//! Every client computes remaining time from the same `starts_at` and
//! `duration_minutes` pair, so countdowns agree without any server-side
//! ticking. [`Countdown`] is the pure arithmetic; [`CountdownTimer`] drives it
//! once per second on a Tokio task and reports expiry exactly once.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Rounds show the "ending soon" state under this many seconds.
pub const ENDING_SOON_SECONDS: u64 = 30;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining-time arithmetic for a fixed anchor.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use pitchmatch::domain::Countdown;
///
/// let start = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
/// let countdown = Countdown::new(start, 5);
/// let now = start + TimeDelta::seconds(30);
/// assert_eq!(countdown.remaining_seconds(now), 270);
/// assert_eq!(countdown.format_remaining(now), "04:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    starts_at: DateTime<Utc>,
    duration_minutes: u32,
}

impl Countdown {
    /// Anchor a countdown. The pair cannot change afterwards.
    pub fn new(starts_at: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            starts_at,
            duration_minutes,
        }
    }

    /// Shared anchor every client counts down from.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Configured round length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// `starts_at + duration`.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.starts_at + TimeDelta::minutes(i64::from(self.duration_minutes))
    }

    /// Whole seconds left at `now`, never negative.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((self.end_time() - now).num_seconds()).unwrap_or(0)
    }

    /// True once `now` reaches [`Countdown::end_time`].
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) == 0
    }

    /// True while the round is live but inside its final seconds.
    pub fn is_ending_soon(&self, now: DateTime<Utc>) -> bool {
        let remaining = self.remaining_seconds(now);
        remaining > 0 && remaining < ENDING_SOON_SECONDS
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn format_remaining(&self, now: DateTime<Utc>) -> String {
        format_mm_ss(self.remaining_seconds(now))
    }

    /// Share of the round still to run, from 100 down to 0. Presentation only.
    pub fn completion_percentage(&self, now: DateTime<Utc>) -> f64 {
        let total = u64::from(self.duration_minutes) * 60;
        if total == 0 {
            return 0.0;
        }
        self.remaining_seconds(now) as f64 / total as f64 * 100.0
    }
}

/// Format whole seconds as `MM:SS`; minutes are not capped at 59.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Receives countdown progress from a [`CountdownTimer`].
#[cfg_attr(test, mockall::automock)]
pub trait CountdownObserver: Send + Sync {
    /// Called on every tick with the current remaining seconds.
    fn on_tick(&self, remaining_seconds: u64);

    /// Called once when the countdown reaches zero.
    fn on_expire(&self);
}

/// Ticking countdown bound to a Tokio task.
///
/// The task ticks immediately, then once per second. When remaining time hits
/// zero it calls [`CountdownObserver::on_expire`] once and stops. Dropping the
/// handle or calling [`CountdownTimer::cancel`] aborts the task.
pub struct CountdownTimer {
    task: JoinHandle<()>,
}

impl CountdownTimer {
    /// Start ticking on the current Tokio runtime.
    pub fn spawn(
        countdown: Countdown,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn CountdownObserver>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(TICK_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let remaining = countdown.remaining_seconds(clock.utc());
                observer.on_tick(remaining);
                if remaining == 0 {
                    debug!(ends_at = %countdown.end_time(), "countdown expired");
                    observer.on_expire();
                    break;
                }
            }
        });
        Self { task }
    }

    /// True once the countdown expired or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop ticking without firing expiry.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "countdown_tests.rs"]
mod tests;
