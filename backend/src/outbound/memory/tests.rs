//! Regression coverage for the in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{RoundDuration, StartupDraft, StartupFields};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

fn startup(name: &str) -> Startup {
    let draft = StartupDraft::new(StartupFields {
        name: name.into(),
        sector: "Fintech".into(),
        category: "Seed".into(),
        country: "Spain".into(),
        one_line_pitch: "Payments".into(),
        ..StartupFields::default()
    })
    .expect("valid draft");
    Startup::from_draft(StartupId::random(), draft, Utc::now())
}

fn new_round(startup_id: StartupId) -> NewRound {
    NewRound {
        startup_id,
        duration: RoundDuration::new(3).expect("valid"),
        starts_at: Utc::now(),
    }
}

#[rstest]
#[tokio::test]
async fn identities_reject_duplicate_emails_and_verify_passwords(store: InMemoryStore) {
    let email = Email::new("Angel@Fund.vc").expect("valid");
    let identity = IdentityRepository::create(&store, &email, "pw-1")
        .await
        .expect("created");

    let duplicate = IdentityRepository::create(&store, &email, "pw-2").await;
    assert!(matches!(
        duplicate,
        Err(IdentityRepositoryError::DuplicateEmail { .. })
    ));

    let good = LoginCredentials::try_from_parts("angel@fund.vc", "pw-1").expect("shape");
    let bad = LoginCredentials::try_from_parts("angel@fund.vc", "pw-2").expect("shape");
    assert_eq!(store.verify(&good).await.expect("verify"), Some(identity));
    assert_eq!(store.verify(&bad).await.expect("verify"), None);
}

#[rstest]
#[tokio::test]
async fn start_round_numbers_and_deactivates(store: InMemoryStore) {
    let s = startup("Ledger");
    StartupRepository::insert(&store, &s).await.expect("insert");

    for expected in 1..=3 {
        let round = store.start_round(&new_round(s.id)).await.expect("start");
        assert_eq!(round.current_round_number, expected);
    }
    let rounds = RoundRepository::list(&store).await.expect("list");
    assert_eq!(rounds.iter().filter(|r| r.is_active).count(), 1);
    let active = store.find_active().await.expect("active").expect("live");
    assert_eq!(active.current_round_number, 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_start_rounds_stay_single_active() {
    let store = Arc::new(InMemoryStore::new());
    let s = startup("Ledger");
    StartupRepository::insert(store.as_ref(), &s).await.expect("insert");
    let startup_id = s.id;
    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.start_round(&new_round(startup_id)).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("joins").expect("starts");
    }
    let rounds = RoundRepository::list(store.as_ref()).await.expect("list");
    assert_eq!(rounds.len(), 20);
    assert_eq!(rounds.iter().filter(|r| r.is_active).count(), 1);
}

#[rstest]
#[tokio::test]
async fn stopping_stamps_update_time(store: InMemoryStore) {
    let s = startup("Ledger");
    StartupRepository::insert(&store, &s).await.expect("insert");
    let round = store.start_round(&new_round(s.id)).await.expect("start");
    let later = round.starts_at + TimeDelta::minutes(1);
    let stopped = store
        .stop_round(&round.id, later)
        .await
        .expect("stop")
        .expect("exists");
    assert!(!stopped.is_active);
    assert_eq!(stopped.updated_at, later);
    assert!(store.find_active().await.expect("active").is_none());
    assert!(
        store
            .stop_round(&RoundId::random(), later)
            .await
            .expect("stop")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn starting_a_round_for_a_missing_startup_changes_nothing(store: InMemoryStore) {
    let s = startup("Ledger");
    StartupRepository::insert(&store, &s).await.expect("insert");
    let live = store.start_round(&new_round(s.id)).await.expect("start");

    let ghost = StartupId::random();
    let err = store
        .start_round(&new_round(ghost))
        .await
        .expect_err("startup is gone");
    assert_eq!(err, RoundRepositoryError::missing_startup(ghost.to_string()));

    let active = store.find_active().await.expect("active").expect("still live");
    assert_eq!(active.id, live.id);
    assert_eq!(RoundRepository::list(&store).await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn deleting_a_startup_cascades(store: InMemoryStore) {
    let s = startup("Ledger");
    StartupRepository::insert(&store, &s).await.expect("insert");
    let round = store.start_round(&new_round(s.id)).await.expect("start");
    let investor = ProfileId::random();
    store
        .upsert(&Selection::mark(investor, s.id, Some(round.id), Utc::now()))
        .await
        .expect("upsert");

    assert!(StartupRepository::delete(&store, &s.id).await.expect("delete"));

    assert!(StartupRepository::list(&store).await.expect("list").is_empty());
    assert!(store.list_all().await.expect("selections").is_empty());
    let rounds = RoundRepository::list(&store).await.expect("rounds");
    assert_eq!(rounds[0].startup_id, None);
    assert!(!StartupRepository::delete(&store, &s.id).await.expect("delete"));
}

#[rstest]
#[tokio::test]
async fn deleting_a_profile_removes_its_selections(store: InMemoryStore) {
    let profile = Profile {
        id: ProfileId::random(),
        email: Email::new("angel@fund.vc").expect("valid"),
        role: Role::Investor,
        created_at: Utc::now(),
    };
    ProfileRepository::insert(&store, &profile).await.expect("insert");
    let duplicate = ProfileRepository::insert(&store, &profile).await;
    assert!(matches!(duplicate, Err(ProfileRepositoryError::Duplicate { .. })));

    let kept_investor = ProfileId::random();
    let s = StartupId::random();
    store
        .upsert(&Selection::mark(profile.id, s, None, Utc::now()))
        .await
        .expect("upsert");
    store
        .upsert(&Selection::mark(kept_investor, s, None, Utc::now()))
        .await
        .expect("upsert");

    assert!(ProfileRepository::delete(&store, &profile.id).await.expect("delete"));

    let remaining = store.list_all().await.expect("selections");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].investor_id, kept_investor);
}

#[rstest]
#[tokio::test]
async fn upsert_overwrites_the_pair(store: InMemoryStore) {
    let investor = ProfileId::random();
    let s = StartupId::random();
    let first = Selection::mark(investor, s, None, Utc::now());
    let mut second = first.clone();
    second.round_id = Some(RoundId::random());
    store.upsert(&first).await.expect("upsert");
    store.upsert(&second).await.expect("upsert");

    let listed = store.list_for_investor(&investor).await.expect("list");
    assert_eq!(listed, vec![second]);
}
