//! Tests for countdown arithmetic and the ticking timer.

use std::sync::Mutex;

use chrono::TimeZone;
use rstest::{fixture, rstest};
use tokio::time::Instant;

use super::*;

#[fixture]
fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Wall clock that follows Tokio's (pausable) clock from a fixed origin.
struct TokioClock {
    origin: DateTime<Utc>,
    base: Instant,
}

impl TokioClock {
    fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            base: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.utc().with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.base.elapsed()).expect("elapsed fits");
        self.origin + elapsed
    }
}

#[derive(Default)]
struct RecordingObserver {
    ticks: Mutex<Vec<u64>>,
    expirations: Mutex<u32>,
}

impl RecordingObserver {
    fn ticks(&self) -> Vec<u64> {
        self.ticks.lock().expect("ticks lock").clone()
    }

    fn expirations(&self) -> u32 {
        *self.expirations.lock().expect("expirations lock")
    }
}

impl CountdownObserver for RecordingObserver {
    fn on_tick(&self, remaining_seconds: u64) {
        self.ticks.lock().expect("ticks lock").push(remaining_seconds);
    }

    fn on_expire(&self) {
        *self.expirations.lock().expect("expirations lock") += 1;
    }
}

#[rstest]
#[case(30, 270, "04:30")]
#[case(0, 300, "05:00")]
#[case(299, 1, "00:01")]
#[case(300, 0, "00:00")]
#[case(301, 0, "00:00")]
#[case(-60, 360, "06:00")]
fn remaining_time_for_five_minute_round(
    start: DateTime<Utc>,
    #[case] offset_seconds: i64,
    #[case] remaining: u64,
    #[case] display: &str,
) {
    let countdown = Countdown::new(start, 5);
    let now = start + TimeDelta::seconds(offset_seconds);
    assert_eq!(countdown.remaining_seconds(now), remaining);
    assert_eq!(countdown.format_remaining(now), display);
    assert_eq!(countdown.is_expired(now), remaining == 0);
}

#[rstest]
fn past_anchor_is_immediately_expired(start: DateTime<Utc>) {
    let countdown = Countdown::new(start - TimeDelta::hours(2), 30);
    assert!(countdown.is_expired(start));
    assert!(!countdown.is_ending_soon(start));
}

#[rstest]
#[case(269, false)]
#[case(271, true)]
#[case(299, true)]
#[case(300, false)]
fn ending_soon_covers_the_final_thirty_seconds(
    start: DateTime<Utc>,
    #[case] offset_seconds: i64,
    #[case] expected: bool,
) {
    let countdown = Countdown::new(start, 5);
    let now = start + TimeDelta::seconds(offset_seconds);
    assert_eq!(countdown.is_ending_soon(now), expected);
}

#[rstest]
fn percentage_falls_from_full_to_zero(start: DateTime<Utc>) {
    let countdown = Countdown::new(start, 2);
    assert!((countdown.completion_percentage(start) - 100.0).abs() < f64::EPSILON);
    let halfway = start + TimeDelta::seconds(60);
    assert!((countdown.completion_percentage(halfway) - 50.0).abs() < f64::EPSILON);
    let after = start + TimeDelta::seconds(500);
    assert!(countdown.completion_percentage(after).abs() < f64::EPSILON);
}

#[rstest]
#[case(0, "00:00")]
#[case(59, "00:59")]
#[case(61, "01:01")]
#[case(6000, "100:00")]
fn formats_minutes_and_seconds(#[case] seconds: u64, #[case] expected: &str) {
    assert_eq!(format_mm_ss(seconds), expected);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn timer_counts_down_then_expires_once(start: DateTime<Utc>) {
    let observer = Arc::new(RecordingObserver::default());
    let timer = CountdownTimer::spawn(
        Countdown::new(start, 1),
        Arc::new(TokioClock::starting_at(start)),
        observer.clone(),
    );

    time::sleep(Duration::from_secs(120)).await;

    let expected: Vec<u64> = (0..=60).rev().collect();
    assert_eq!(observer.ticks(), expected);
    assert_eq!(observer.expirations(), 1);
    assert!(timer.is_finished());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn timer_started_after_the_deadline_expires_on_first_tick(start: DateTime<Utc>) {
    let mut observer = MockCountdownObserver::new();
    observer.expect_on_tick().withf(|r| *r == 0).times(1).return_const(());
    observer.expect_on_expire().times(1).return_const(());

    let timer = CountdownTimer::spawn(
        Countdown::new(start, 5),
        Arc::new(TokioClock::starting_at(start + TimeDelta::seconds(301))),
        Arc::new(observer),
    );

    time::sleep(Duration::from_secs(5)).await;
    assert!(timer.is_finished());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_ticking(start: DateTime<Utc>) {
    let observer = Arc::new(RecordingObserver::default());
    let timer = CountdownTimer::spawn(
        Countdown::new(start, 5),
        Arc::new(TokioClock::starting_at(start)),
        observer.clone(),
    );

    time::sleep(Duration::from_millis(2_500)).await;
    drop(timer);
    time::sleep(Duration::from_secs(600)).await;

    assert_eq!(observer.ticks(), vec![300, 299, 298]);
    assert_eq!(observer.expirations(), 0);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cancel_prevents_expiry(start: DateTime<Utc>) {
    let mut observer = MockCountdownObserver::new();
    observer.expect_on_tick().return_const(());
    observer.expect_on_expire().never();

    let timer = CountdownTimer::spawn(
        Countdown::new(start, 1),
        Arc::new(TokioClock::starting_at(start)),
        Arc::new(observer),
    );
    time::sleep(Duration::from_secs(10)).await;
    timer.cancel();
    time::sleep(Duration::from_secs(120)).await;
}
