//! Driving ports for the round controller.

use async_trait::async_trait;

use crate::domain::{ActiveRound, Error, Round, RoundDuration, RoundId, StartupId};

/// Round controller commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoundCommand: Send + Sync {
    /// Replace any live round with a new one presenting `startup_id`.
    async fn start(&self, startup_id: &StartupId, duration: RoundDuration)
    -> Result<Round, Error>;

    /// End a round. Stopping an inactive round succeeds.
    async fn stop(&self, round_id: &RoundId) -> Result<Round, Error>;
}

/// Round controller reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoundQuery: Send + Sync {
    /// The live round joined with its startup, if any.
    async fn active(&self) -> Result<Option<ActiveRound>, Error>;

    /// Round history, newest first.
    async fn history(&self) -> Result<Vec<Round>, Error>;
}
