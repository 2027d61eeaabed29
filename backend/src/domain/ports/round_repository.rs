//! Port for round persistence.
//!
//! `start_round` is the single atomic command behind the one-active-round
//! invariant: adapters deactivate every live round, pick the next number and
//! insert the new round without interleaving with other starts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewRound, Round, RoundId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by round repository adapters.
    pub enum RoundRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "round repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "round repository query failed: {message}",
        /// The startup vanished before the round could reference it.
        MissingStartup { startup_id: String } =>
            "startup {startup_id} no longer exists",
    }
}

/// Port for the round store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoundRepository: Send + Sync {
    /// Deactivate all rounds and insert `round` as the only active one.
    ///
    /// The new round number is the highest existing number plus one, or 1.
    /// Fails with `MissingStartup`, leaving every round untouched, when the
    /// startup is gone at commit time.
    async fn start_round(&self, round: &NewRound) -> Result<Round, RoundRepositoryError>;

    /// Mark a round inactive, stamping `at` as its update time.
    ///
    /// Returns `None` when the round does not exist.
    async fn stop_round(
        &self,
        id: &RoundId,
        at: DateTime<Utc>,
    ) -> Result<Option<Round>, RoundRepositoryError>;

    /// The most recently created active round.
    async fn find_active(&self) -> Result<Option<Round>, RoundRepositoryError>;

    /// Round history, newest first.
    async fn list(&self) -> Result<Vec<Round>, RoundRepositoryError>;
}
