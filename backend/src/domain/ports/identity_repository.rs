//! Port for the identity store: email/password records behind sessions.

use async_trait::async_trait;

use crate::domain::{Email, Identity, LoginCredentials, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity repository adapters.
    pub enum IdentityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "identity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "identity repository query failed: {message}",
        /// An identity already uses this email.
        DuplicateEmail { email: String } =>
            "identity already exists for {email}",
    }
}

/// Port for creating, verifying and removing identities.
///
/// Password hashing stays inside the adapter; callers only ever hand over the
/// plaintext secret.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Create an identity with a freshly hashed password.
    async fn create(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityRepositoryError>;

    /// Return the identity when the credentials match, `None` otherwise.
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Find an identity by id.
    async fn find_by_id(&self, id: &ProfileId)
    -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Remove an identity. Returns `false` when nothing was removed.
    async fn delete(&self, id: &ProfileId) -> Result<bool, IdentityRepositoryError>;
}
