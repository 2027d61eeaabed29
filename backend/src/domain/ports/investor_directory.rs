//! Driving port for admin management of investor accounts.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Profile, ProfileId};

/// Investor provisioning and listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvestorDirectory: Send + Sync {
    /// Investor profiles, newest first.
    async fn list(&self) -> Result<Vec<Profile>, Error>;

    /// Create an identity plus investor profile.
    ///
    /// Requires privileged provisioning to be configured; otherwise
    /// `service_unavailable`.
    async fn create(&self, credentials: &LoginCredentials) -> Result<Profile, Error>;

    /// Remove the investor's profile, selections and identity.
    async fn delete(&self, id: &ProfileId) -> Result<(), Error>;
}
