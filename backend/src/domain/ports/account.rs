//! Driving ports resolving a signed-in identity into a role.

use async_trait::async_trait;

use crate::domain::{Error, Profile, ProfileId, SessionStatus};

/// Read side: who is the caller and what may they do.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Resolve a session's identity into a status.
    ///
    /// A vanished identity reads as unauthenticated; an identity without a
    /// profile reads as `NoProfile`.
    async fn session_status(&self, id: &ProfileId) -> Result<SessionStatus, Error>;

    /// The caller's profile, or `forbidden` when the identity has none.
    async fn profile(&self, id: &ProfileId) -> Result<Profile, Error>;
}

/// Write side: close the authorisation gap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Attach an admin profile to an identity that has none.
    ///
    /// Fails with `conflict` when a profile already exists.
    async fn bootstrap_admin(&self, id: &ProfileId) -> Result<Profile, Error>;
}
