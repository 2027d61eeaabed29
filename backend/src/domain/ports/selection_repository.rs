//! Port for investor selections.

use async_trait::async_trait;

use crate::domain::{ProfileId, Selection, StartupId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by selection repository adapters.
    pub enum SelectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "selection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "selection repository query failed: {message}",
    }
}

/// Port for selection rows keyed by `(investor_id, startup_id)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionRepository: Send + Sync {
    async fn find(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<Option<Selection>, SelectionRepositoryError>;

    /// Insert or overwrite the row for the pair.
    async fn upsert(&self, selection: &Selection) -> Result<(), SelectionRepositoryError>;

    /// Remove the row for the pair. Returns `false` when none existed.
    async fn delete(
        &self,
        investor_id: &ProfileId,
        startup_id: &StartupId,
    ) -> Result<bool, SelectionRepositoryError>;

    /// One investor's selections, newest first.
    async fn list_for_investor(
        &self,
        investor_id: &ProfileId,
    ) -> Result<Vec<Selection>, SelectionRepositoryError>;

    /// Every selection, newest first.
    async fn list_all(&self) -> Result<Vec<Selection>, SelectionRepositoryError>;
}
