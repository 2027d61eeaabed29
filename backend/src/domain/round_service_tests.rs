//! Tests for the round controller.

use std::sync::Mutex as StdMutex;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockChangeFeed, MockRoundRepository, MockStartupRepository};
use crate::domain::{ErrorCode, Startup, StartupDraft, StartupFields};
use crate::test_support::clock::MutableClock;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn startup(now: DateTime<Utc>) -> Startup {
    let draft = StartupDraft::new(StartupFields {
        name: "Orbital".into(),
        sector: "DeepTech".into(),
        category: "Seed".into(),
        country: "France".into(),
        one_line_pitch: "Satellites as a service".into(),
        ..StartupFields::default()
    })
    .expect("valid draft");
    Startup::from_draft(StartupId::random(), draft, now)
}

fn startups_with(startup: Startup) -> MockStartupRepository {
    let mut startups = MockStartupRepository::new();
    startups
        .expect_find_by_id()
        .returning(move |id| Ok((*id == startup.id).then(|| startup.clone())));
    startups
}

fn quiet_feed() -> MockChangeFeed {
    let mut feed = MockChangeFeed::new();
    feed.expect_publish().return_const(());
    feed
}

fn round_from(new_round: &NewRound, number: u32) -> Round {
    Round {
        id: RoundId::random(),
        current_round_number: number,
        duration_minutes: new_round.duration.minutes(),
        starts_at: new_round.starts_at,
        is_active: true,
        startup_id: Some(new_round.startup_id),
        created_at: new_round.starts_at,
        updated_at: new_round.starts_at,
    }
}

fn five_minutes() -> RoundDuration {
    RoundDuration::new(5).expect("valid duration")
}

#[rstest]
#[tokio::test]
async fn start_anchors_round_on_clock_and_notifies(now: DateTime<Utc>) {
    let startup = startup(now);
    let startup_id = startup.id;
    let mut rounds = MockRoundRepository::new();
    rounds
        .expect_start_round()
        .withf(move |r| r.starts_at == now && r.startup_id == startup_id)
        .times(1)
        .returning(|r| Ok(round_from(r, 1)));
    let mut feed = MockChangeFeed::new();
    feed.expect_publish()
        .withf(|e| *e == ChangeEvent::new(ChangeTable::Rounds, ChangeKind::Insert))
        .times(1)
        .return_const(());

    let service = RoundService::new(
        Arc::new(rounds),
        Arc::new(startups_with(startup)),
        Arc::new(feed),
        Arc::new(MutableClock::new(now)),
    );
    let round = service
        .start(&startup_id, five_minutes())
        .await
        .expect("round starts");

    assert_eq!(round.starts_at, now);
    assert_eq!(round.duration_minutes, 5);
    assert!(round.is_active);
}

#[rstest]
#[tokio::test]
async fn start_for_unknown_startup_is_not_found(now: DateTime<Utc>) {
    let mut rounds = MockRoundRepository::new();
    rounds.expect_start_round().never();
    let service = RoundService::new(
        Arc::new(rounds),
        Arc::new(startups_with(startup(now))),
        Arc::new(quiet_feed()),
        Arc::new(MutableClock::new(now)),
    );

    let err = service
        .start(&StartupId::random(), five_minutes())
        .await
        .expect_err("unknown startup");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn startup_deleted_mid_start_is_not_found(now: DateTime<Utc>) {
    let startup = startup(now);
    let startup_id = startup.id;
    let mut rounds = MockRoundRepository::new();
    rounds
        .expect_start_round()
        .times(1)
        .returning(|r| Err(RoundRepositoryError::missing_startup(r.startup_id.to_string())));
    let mut feed = MockChangeFeed::new();
    feed.expect_publish().never();
    let service = RoundService::new(
        Arc::new(rounds),
        Arc::new(startups_with(startup)),
        Arc::new(feed),
        Arc::new(MutableClock::new(now)),
    );

    let err = service
        .start(&startup_id, five_minutes())
        .await
        .expect_err("startup vanished");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn stop_of_unknown_round_is_not_found(now: DateTime<Utc>) {
    let mut rounds = MockRoundRepository::new();
    rounds.expect_stop_round().return_once(|_, _| Ok(None));
    let mut feed = MockChangeFeed::new();
    feed.expect_publish().never();
    let service = RoundService::new(
        Arc::new(rounds),
        Arc::new(MockStartupRepository::new()),
        Arc::new(feed),
        Arc::new(MutableClock::new(now)),
    );

    let err = service
        .stop(&RoundId::random())
        .await
        .expect_err("unknown round");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn active_joins_startup(now: DateTime<Utc>) {
    let startup = startup(now);
    let startup_id = startup.id;
    let mut rounds = MockRoundRepository::new();
    rounds.expect_find_active().return_once(move || {
        Ok(Some(round_from(
            &NewRound {
                startup_id,
                duration: five_minutes(),
                starts_at: now,
            },
            4,
        )))
    });
    let service = RoundService::new(
        Arc::new(rounds),
        Arc::new(startups_with(startup.clone())),
        Arc::new(quiet_feed()),
        Arc::new(MutableClock::new(now)),
    );

    let active = service.active().await.expect("query").expect("live round");
    assert_eq!(active.round.current_round_number, 4);
    assert_eq!(active.startup, Some(startup));
}

#[rstest]
#[tokio::test]
async fn store_failures_map_to_error_codes(now: DateTime<Utc>) {
    let mut rounds = MockRoundRepository::new();
    rounds
        .expect_find_active()
        .return_once(|| Err(RoundRepositoryError::connection("refused")));
    rounds
        .expect_list()
        .return_once(|| Err(RoundRepositoryError::query("syntax")));
    let service = RoundService::new(
        Arc::new(rounds),
        Arc::new(MockStartupRepository::new()),
        Arc::new(quiet_feed()),
        Arc::new(MutableClock::new(now)),
    );

    let err = service.active().await.expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    let err = service.history().await.expect_err("internal");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

/// Round store whose start is deliberately not atomic: it yields between
/// reading and writing, so unserialised callers would interleave.
#[derive(Default)]
struct InterleavingRounds {
    rounds: StdMutex<Vec<Round>>,
}

impl InterleavingRounds {
    fn snapshot(&self) -> Vec<Round> {
        self.rounds.lock().expect("rounds lock").clone()
    }
}

#[async_trait]
impl RoundRepository for InterleavingRounds {
    async fn start_round(&self, round: &NewRound) -> Result<Round, RoundRepositoryError> {
        let next = self
            .snapshot()
            .iter()
            .map(|r| r.current_round_number)
            .max()
            .unwrap_or(0)
            + 1;
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        let mut rounds = self.rounds.lock().expect("rounds lock");
        for existing in rounds.iter_mut() {
            existing.is_active = false;
        }
        let created = round_from(round, next);
        rounds.push(created.clone());
        Ok(created)
    }

    async fn stop_round(
        &self,
        id: &RoundId,
        at: DateTime<Utc>,
    ) -> Result<Option<Round>, RoundRepositoryError> {
        let mut rounds = self.rounds.lock().expect("rounds lock");
        Ok(rounds.iter_mut().find(|r| r.id == *id).map(|r| {
            r.is_active = false;
            r.updated_at = at;
            r.clone()
        }))
    }

    async fn find_active(&self) -> Result<Option<Round>, RoundRepositoryError> {
        Ok(self.snapshot().into_iter().rev().find(|r| r.is_active))
    }

    async fn list(&self) -> Result<Vec<Round>, RoundRepositoryError> {
        let mut rounds = self.snapshot();
        rounds.reverse();
        Ok(rounds)
    }
}

#[rstest]
#[tokio::test]
async fn sequential_starts_number_rounds_and_keep_one_active(now: DateTime<Utc>) {
    let startup = startup(now);
    let startup_id = startup.id;
    let store = Arc::new(InterleavingRounds::default());
    let clock = Arc::new(MutableClock::new(now));
    let service = RoundService::new(
        store.clone(),
        Arc::new(startups_with(startup)),
        Arc::new(quiet_feed()),
        clock.clone(),
    );

    for _ in 0..3 {
        service
            .start(&startup_id, five_minutes())
            .await
            .expect("round starts");
        clock.advance_seconds(10);
    }

    let rounds = store.snapshot();
    let numbers: Vec<u32> = rounds.iter().map(|r| r.current_round_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    let active: Vec<&Round> = rounds.iter().filter(|r| r.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].current_round_number, 3);
    assert_eq!(active[0].starts_at, now + TimeDelta::seconds(20));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_leave_exactly_one_active_round(now: DateTime<Utc>) {
    let startup = startup(now);
    let startup_id = startup.id;
    let store = Arc::new(InterleavingRounds::default());
    let service = Arc::new(RoundService::new(
        store.clone(),
        Arc::new(startups_with(startup)),
        Arc::new(quiet_feed()),
        Arc::new(MutableClock::new(now)),
    ));

    let tasks: Vec<_> = (0..12)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.start(&startup_id, five_minutes()).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("task joins").expect("round starts");
    }

    let rounds = store.snapshot();
    assert_eq!(rounds.iter().filter(|r| r.is_active).count(), 1);
    let mut numbers: Vec<u32> = rounds.iter().map(|r| r.current_round_number).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    let active = service.active().await.expect("query").expect("live round");
    assert_eq!(active.round.current_round_number, 12);
}

#[rstest]
#[tokio::test]
async fn stop_is_idempotent(now: DateTime<Utc>) {
    let startup = startup(now);
    let startup_id = startup.id;
    let store = Arc::new(InterleavingRounds::default());
    let service = RoundService::new(
        store.clone(),
        Arc::new(startups_with(startup)),
        Arc::new(quiet_feed()),
        Arc::new(MutableClock::new(now)),
    );

    let round = service
        .start(&startup_id, five_minutes())
        .await
        .expect("round starts");
    let first = service.stop(&round.id).await.expect("stops");
    let second = service.stop(&round.id).await.expect("stops again");

    assert!(!first.is_active);
    assert!(!second.is_active);
    assert!(service.active().await.expect("query").is_none());
}
