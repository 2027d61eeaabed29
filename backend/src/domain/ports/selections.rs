//! Driving ports for investor selections.

use async_trait::async_trait;

use crate::domain::{Error, ProfileId, SelectedStartup, Selection, StartupId, ToggleOutcome};

/// Investor selection mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionCommand: Send + Sync {
    /// Select when unselected, deselect when selected.
    async fn toggle(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<ToggleOutcome, Error>;

    /// Mark a startup, overwriting any previous mark.
    async fn select(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<Selection, Error>;

    /// Remove a mark. Removing an absent mark succeeds.
    async fn deselect(&self, investor_id: &ProfileId, startup_id: &StartupId)
    -> Result<(), Error>;
}

/// Investor selection reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionQuery: Send + Sync {
    /// The investor's selected startups, newest selection first.
    async fn selected(&self, investor_id: &ProfileId) -> Result<Vec<SelectedStartup>, Error>;
}
