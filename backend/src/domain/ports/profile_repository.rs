//! Port for role-bearing profiles.

use async_trait::async_trait;

use crate::domain::{Profile, ProfileId, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
        /// A profile already exists for the identity.
        Duplicate { id: String } =>
            "profile already exists for {id}",
    }
}

/// Port for reading and writing profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile attached to an identity.
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Insert a profile; fails with `Duplicate` when one exists.
    async fn insert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;

    /// List profiles holding `role`, newest first.
    async fn list_by_role(&self, role: Role) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Delete a profile together with its selections.
    ///
    /// Returns `false` when no profile existed.
    async fn delete(&self, id: &ProfileId) -> Result<bool, ProfileRepositoryError>;
}
