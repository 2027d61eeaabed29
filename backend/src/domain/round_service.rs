//! Round controller.
//!
//! Owns the single-live-round state machine:
//!
//! ```text
//! Idle --start--> Live --start--> Live (replaced)
//!                 Live --stop---> Idle
//! ```
//!
//! Starts are serialised twice. The service admits one start at a time, and
//! each start is a single atomic store command, so concurrent admins cannot
//! leave two rounds active.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::ports::{
    ChangeFeed, RoundCommand, RoundQuery, RoundRepository, RoundRepositoryError,
    StartupRepository,
};
use crate::domain::startup_service::map_startup_error;
use crate::domain::{
    ActiveRound, ChangeEvent, ChangeKind, ChangeTable, Error, NewRound, Round, RoundDuration,
    RoundId, StartupId,
};

pub(crate) fn map_round_error(error: RoundRepositoryError) -> Error {
    match error {
        RoundRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("round store unavailable: {message}"))
        }
        RoundRepositoryError::Query { message } => {
            Error::internal(format!("round store error: {message}"))
        }
        RoundRepositoryError::MissingStartup { startup_id } => {
            Error::not_found(format!("startup {startup_id} not found"))
        }
    }
}

/// Round service implementing the round driving ports.
pub struct RoundService<R, S> {
    rounds: Arc<R>,
    startups: Arc<S>,
    feed: Arc<dyn ChangeFeed>,
    clock: Arc<dyn Clock>,
    start_lock: Mutex<()>,
}

impl<R, S> RoundService<R, S> {
    /// Wire the controller to its stores, change feed and clock.
    pub fn new(
        rounds: Arc<R>,
        startups: Arc<S>,
        feed: Arc<dyn ChangeFeed>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rounds,
            startups,
            feed,
            clock,
            start_lock: Mutex::new(()),
        }
    }

    fn publish(&self, kind: ChangeKind) {
        self.feed.publish(ChangeEvent::new(ChangeTable::Rounds, kind));
    }
}

#[async_trait]
impl<R, S> RoundCommand for RoundService<R, S>
where
    R: RoundRepository,
    S: StartupRepository,
{
    async fn start(
        &self,
        startup_id: &StartupId,
        duration: RoundDuration,
    ) -> Result<Round, Error> {
        if self
            .startups
            .find_by_id(startup_id)
            .await
            .map_err(map_startup_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("startup {startup_id} not found")));
        }

        let round = {
            let _guard = self.start_lock.lock().await;
            self.rounds
                .start_round(&NewRound {
                    startup_id: *startup_id,
                    duration,
                    starts_at: self.clock.utc(),
                })
                .await
                .map_err(map_round_error)?
        };
        info!(
            round_id = %round.id,
            round_number = round.current_round_number,
            startup_id = %startup_id,
            duration_minutes = round.duration_minutes,
            "round started"
        );
        self.publish(ChangeKind::Insert);
        Ok(round)
    }

    async fn stop(&self, round_id: &RoundId) -> Result<Round, Error> {
        let round = self
            .rounds
            .stop_round(round_id, self.clock.utc())
            .await
            .map_err(map_round_error)?
            .ok_or_else(|| Error::not_found(format!("round {round_id} not found")))?;
        info!(round_id = %round.id, round_number = round.current_round_number, "round stopped");
        self.publish(ChangeKind::Update);
        Ok(round)
    }
}

#[async_trait]
impl<R, S> RoundQuery for RoundService<R, S>
where
    R: RoundRepository,
    S: StartupRepository,
{
    async fn active(&self) -> Result<Option<ActiveRound>, Error> {
        let Some(round) = self.rounds.find_active().await.map_err(map_round_error)? else {
            return Ok(None);
        };
        let startup = match round.startup_id {
            Some(id) => self
                .startups
                .find_by_id(&id)
                .await
                .map_err(map_startup_error)?,
            None => None,
        };
        Ok(Some(ActiveRound { round, startup }))
    }

    async fn history(&self) -> Result<Vec<Round>, Error> {
        self.rounds.list().await.map_err(map_round_error)
    }
}

#[cfg(test)]
#[path = "round_service_tests.rs"]
mod tests;
