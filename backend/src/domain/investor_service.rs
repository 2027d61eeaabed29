//! Admin provisioning of investor accounts.
//!
//! Creating or removing an account touches both the identity store and the
//! profile store, which is a privileged operation. It is only available when
//! the deployment is configured with a service key.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::account_service::{map_identity_error, map_profile_error};
use crate::domain::ports::{IdentityRepository, InvestorDirectory, ProfileRepository};
use crate::domain::{Error, LoginCredentials, Profile, ProfileId, Role};

/// Whether privileged account operations are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    Enabled,
    Disabled,
}

/// Investor directory backed by the identity and profile stores.
#[derive(Clone)]
pub struct InvestorService<I, P> {
    identities: Arc<I>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    provisioning: Provisioning,
}

impl<I, P> InvestorService<I, P> {
    /// New investors can only be created when `provisioning` allows it.
    pub fn new(
        identities: Arc<I>,
        profiles: Arc<P>,
        clock: Arc<dyn Clock>,
        provisioning: Provisioning,
    ) -> Self {
        Self {
            identities,
            profiles,
            clock,
            provisioning,
        }
    }

    fn require_provisioning(&self) -> Result<(), Error> {
        match self.provisioning {
            Provisioning::Enabled => Ok(()),
            Provisioning::Disabled => Err(Error::service_unavailable(
                "investor provisioning disabled: no service key configured",
            )),
        }
    }
}

#[async_trait]
impl<I, P> InvestorDirectory for InvestorService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    async fn list(&self) -> Result<Vec<Profile>, Error> {
        self.profiles
            .list_by_role(Role::Investor)
            .await
            .map_err(map_profile_error)
    }

    async fn create(&self, credentials: &LoginCredentials) -> Result<Profile, Error> {
        self.require_provisioning()?;
        let identity = self
            .identities
            .create(credentials.email(), credentials.password())
            .await
            .map_err(map_identity_error)?;

        let profile = Profile {
            id: identity.id,
            email: identity.email,
            role: Role::Investor,
            created_at: self.clock.utc(),
        };
        if let Err(error) = self.profiles.insert(&profile).await {
            // Leave no identity behind that could sign in without a profile.
            if let Err(cleanup) = self.identities.delete(&profile.id).await {
                warn!(profile_id = %profile.id, error = %cleanup, "orphaned identity cleanup failed");
            }
            return Err(map_profile_error(error));
        }
        info!(profile_id = %profile.id, "investor created");
        Ok(profile)
    }

    async fn delete(&self, id: &ProfileId) -> Result<(), Error> {
        self.require_provisioning()?;
        let profile = self
            .profiles
            .find_by_id(id)
            .await
            .map_err(map_profile_error)?
            .filter(|profile| profile.role == Role::Investor)
            .ok_or_else(|| Error::not_found(format!("investor {id} not found")))?;

        self.profiles
            .delete(&profile.id)
            .await
            .map_err(map_profile_error)?;
        self.identities
            .delete(&profile.id)
            .await
            .map_err(map_identity_error)?;
        info!(profile_id = %profile.id, "investor deleted");
        Ok(())
    }
}
