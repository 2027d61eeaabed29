//! Port for startup persistence.

use async_trait::async_trait;

use crate::domain::{Startup, StartupId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by startup repository adapters.
    pub enum StartupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "startup repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "startup repository query failed: {message}",
    }
}

/// Port for startup CRUD.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StartupRepository: Send + Sync {
    /// All startups, newest first.
    async fn list(&self) -> Result<Vec<Startup>, StartupRepositoryError>;

    async fn find_by_id(&self, id: &StartupId) -> Result<Option<Startup>, StartupRepositoryError>;

    async fn insert(&self, startup: &Startup) -> Result<(), StartupRepositoryError>;

    /// Overwrite editable fields. Returns `false` when the startup is missing.
    async fn update(&self, startup: &Startup) -> Result<bool, StartupRepositoryError>;

    /// Delete a startup, its selections, and unlink it from past rounds.
    ///
    /// Returns `false` when the startup is missing.
    async fn delete(&self, id: &StartupId) -> Result<bool, StartupRepositoryError>;
}
