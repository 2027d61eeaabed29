//! Driving ports for startup management and browsing.

use async_trait::async_trait;

use crate::domain::{Error, Startup, StartupDraft, StartupId};

/// Admin mutations on startups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StartupCommand: Send + Sync {
    async fn create(&self, draft: StartupDraft) -> Result<Startup, Error>;

    /// Replace a startup's editable fields.
    async fn update(&self, id: &StartupId, draft: StartupDraft) -> Result<Startup, Error>;

    /// Delete a startup. Refused with `conflict` while it is on stage.
    async fn delete(&self, id: &StartupId) -> Result<(), Error>;
}

/// Read access for any signed-in role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StartupQuery: Send + Sync {
    /// All startups, newest first.
    async fn list(&self) -> Result<Vec<Startup>, Error>;

    async fn get(&self, id: &StartupId) -> Result<Startup, Error>;
}
