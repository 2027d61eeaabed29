//! Startup management and browsing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ChangeFeed, RoundRepository, StartupCommand, StartupQuery, StartupRepository,
    StartupRepositoryError,
};
use crate::domain::round_service::map_round_error;
use crate::domain::{
    ChangeEvent, ChangeKind, ChangeTable, Error, Startup, StartupDraft, StartupId,
};

pub(crate) fn map_startup_error(error: StartupRepositoryError) -> Error {
    match error {
        StartupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("startup store unavailable: {message}"))
        }
        StartupRepositoryError::Query { message } => {
            Error::internal(format!("startup store error: {message}"))
        }
    }
}

fn not_found(id: &StartupId) -> Error {
    Error::not_found(format!("startup {id} not found"))
}

/// Startup service implementing both startup driving ports.
#[derive(Clone)]
pub struct StartupService<S, R> {
    startups: Arc<S>,
    rounds: Arc<R>,
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
}

impl<S, R> StartupService<S, R> {
    /// Wire the service to its stores. The round store guards deletes of the
    /// live startup.
    pub fn new(
        startups: Arc<S>,
        rounds: Arc<R>,
        feed: Arc<dyn ChangeFeed>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            startups,
            rounds,
            feed,
            clock,
        }
    }

    fn publish(&self, kind: ChangeKind) {
        self.feed.publish(ChangeEvent::new(ChangeTable::Startups, kind));
    }
}

#[async_trait]
impl<S, R> StartupCommand for StartupService<S, R>
where
    S: StartupRepository,
    R: RoundRepository,
{
    async fn create(&self, draft: StartupDraft) -> Result<Startup, Error> {
        let startup = Startup::from_draft(StartupId::random(), draft, self.clock.utc());
        self.startups
            .insert(&startup)
            .await
            .map_err(map_startup_error)?;
        info!(startup_id = %startup.id, name = %startup.name, "startup created");
        self.publish(ChangeKind::Insert);
        Ok(startup)
    }

    async fn update(&self, id: &StartupId, draft: StartupDraft) -> Result<Startup, Error> {
        let mut startup = self
            .startups
            .find_by_id(id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| not_found(id))?;
        startup.apply(draft);
        if !self
            .startups
            .update(&startup)
            .await
            .map_err(map_startup_error)?
        {
            return Err(not_found(id));
        }
        self.publish(ChangeKind::Update);
        Ok(startup)
    }

    async fn delete(&self, id: &StartupId) -> Result<(), Error> {
        let on_stage = self
            .rounds
            .find_active()
            .await
            .map_err(map_round_error)?
            .is_some_and(|round| round.startup_id.as_ref() == Some(id));
        if on_stage {
            return Err(Error::conflict(
                "startup is presenting in the live round; stop the round first",
            ));
        }
        if !self
            .startups
            .delete(id)
            .await
            .map_err(map_startup_error)?
        {
            return Err(not_found(id));
        }
        info!(startup_id = %id, "startup deleted");
        self.publish(ChangeKind::Delete);
        Ok(())
    }
}

#[async_trait]
impl<S, R> StartupQuery for StartupService<S, R>
where
    S: StartupRepository,
    R: RoundRepository,
{
    async fn list(&self) -> Result<Vec<Startup>, Error> {
        self.startups.list().await.map_err(map_startup_error)
    }

    async fn get(&self, id: &StartupId) -> Result<Startup, Error> {
        self.startups
            .find_by_id(id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{MockChangeFeed, MockRoundRepository, MockStartupRepository};
    use crate::domain::{ErrorCode, Round, RoundId, StartupFields};
    use crate::test_support::clock::MutableClock;

    #[fixture]
    fn draft() -> StartupDraft {
        StartupDraft::new(StartupFields {
            name: "Orbital".into(),
            sector: "DeepTech".into(),
            category: "Seed".into(),
            country: "France".into(),
            one_line_pitch: "Satellites as a service".into(),
            ..StartupFields::default()
        })
        .expect("valid draft")
    }

    fn feed_expecting(kind: Option<ChangeKind>) -> MockChangeFeed {
        let mut feed = MockChangeFeed::new();
        match kind {
            Some(kind) => {
                feed.expect_publish()
                    .withf(move |e| *e == ChangeEvent::new(ChangeTable::Startups, kind))
                    .times(1)
                    .return_const(());
            }
            None => {
                feed.expect_publish().never();
            }
        }
        feed
    }

    fn service(
        startups: MockStartupRepository,
        rounds: MockRoundRepository,
        feed: MockChangeFeed,
    ) -> StartupService<MockStartupRepository, MockRoundRepository> {
        StartupService::new(
            Arc::new(startups),
            Arc::new(rounds),
            Arc::new(feed),
            Arc::new(MutableClock::new(Utc::now())),
        )
    }

    fn live_round(startup_id: StartupId) -> Round {
        let now = Utc::now();
        Round {
            id: RoundId::random(),
            current_round_number: 1,
            duration_minutes: 5,
            starts_at: now,
            is_active: true,
            startup_id: Some(startup_id),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_persists_and_notifies(draft: StartupDraft) {
        let mut startups = MockStartupRepository::new();
        startups.expect_insert().times(1).return_once(|_| Ok(()));

        let startup = service(
            startups,
            MockRoundRepository::new(),
            feed_expecting(Some(ChangeKind::Insert)),
        )
        .create(draft)
        .await
        .expect("created");
        assert_eq!(startup.name, "Orbital");
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_startup_is_not_found(draft: StartupDraft) {
        let mut startups = MockStartupRepository::new();
        startups.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(startups, MockRoundRepository::new(), feed_expecting(None))
            .update(&StartupId::random(), draft)
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_refuses_startup_on_stage() {
        let id = StartupId::random();
        let mut rounds = MockRoundRepository::new();
        rounds
            .expect_find_active()
            .return_once(move || Ok(Some(live_round(id))));
        let mut startups = MockStartupRepository::new();
        startups.expect_delete().never();

        let err = service(startups, rounds, feed_expecting(None))
            .delete(&id)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_idle_startup_notifies() {
        let mut rounds = MockRoundRepository::new();
        rounds
            .expect_find_active()
            .return_once(|| Ok(Some(live_round(StartupId::random()))));
        let mut startups = MockStartupRepository::new();
        startups.expect_delete().times(1).return_once(|_| Ok(true));

        service(startups, rounds, feed_expecting(Some(ChangeKind::Delete)))
            .delete(&StartupId::random())
            .await
            .expect("deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn store_outage_is_unavailable() {
        let mut startups = MockStartupRepository::new();
        startups
            .expect_list()
            .return_once(|| Err(StartupRepositoryError::connection("down")));

        let err = service(startups, MockRoundRepository::new(), feed_expecting(None))
            .list()
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
