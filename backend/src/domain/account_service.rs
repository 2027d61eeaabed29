//! Account services: login, session resolution and admin bootstrap.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, AccountQuery, IdentityRepository, IdentityRepositoryError, LoginService,
    ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{Error, Identity, LoginCredentials, Profile, ProfileId, Role, SessionStatus};

/// Upper bound on the session status lookup.
pub const DEFAULT_SESSION_CHECK_TIMEOUT: Duration = Duration::from_secs(8);

pub(crate) fn map_identity_error(error: IdentityRepositoryError) -> Error {
    match error {
        IdentityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("identity store unavailable: {message}"))
        }
        IdentityRepositoryError::Query { message } => {
            Error::internal(format!("identity store error: {message}"))
        }
        IdentityRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("an account already exists for {email}"))
        }
    }
}

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile store unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
        ProfileRepositoryError::Duplicate { .. } => Error::conflict("profile already exists"),
    }
}

/// Authenticates credentials against the identity store.
#[derive(Clone)]
pub struct IdentityLoginService<I> {
    identities: Arc<I>,
}

impl<I> IdentityLoginService<I> {
    pub fn new(identities: Arc<I>) -> Self {
        Self { identities }
    }
}

#[async_trait]
impl<I> LoginService for IdentityLoginService<I>
where
    I: IdentityRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error> {
        self.identities
            .verify(credentials)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}

/// Resolves identities into profiles and closes the authorisation gap.
#[derive(Clone)]
pub struct AccountService<I, P> {
    identities: Arc<I>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    lookup_timeout: Duration,
}

impl<I, P> AccountService<I, P> {
    /// Session checks use the default lookup timeout until overridden.
    pub fn new(identities: Arc<I>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            identities,
            profiles,
            clock,
            lookup_timeout: DEFAULT_SESSION_CHECK_TIMEOUT,
        }
    }

    /// Override the session status lookup bound.
    #[must_use]
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }
}

impl<I, P> AccountService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    async fn resolve(&self, id: &ProfileId) -> Result<SessionStatus, Error> {
        if self
            .identities
            .find_by_id(id)
            .await
            .map_err(map_identity_error)?
            .is_none()
        {
            return Ok(SessionStatus::Unauthenticated);
        }
        let status = match self.profiles.find_by_id(id).await.map_err(map_profile_error)? {
            Some(profile) => SessionStatus::Authenticated { profile },
            None => SessionStatus::NoProfile,
        };
        Ok(status)
    }
}

#[async_trait]
impl<I, P> AccountQuery for AccountService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    async fn session_status(&self, id: &ProfileId) -> Result<SessionStatus, Error> {
        match tokio::time::timeout(self.lookup_timeout, self.resolve(id)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    profile_id = %id,
                    timeout_ms = self.lookup_timeout.as_millis(),
                    "session status lookup timed out; treating caller as signed out"
                );
                Ok(SessionStatus::Unauthenticated)
            }
        }
    }

    async fn profile(&self, id: &ProfileId) -> Result<Profile, Error> {
        self.profiles
            .find_by_id(id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::forbidden("no profile is attached to this account"))
    }
}

#[async_trait]
impl<I, P> AccountCommand for AccountService<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    async fn bootstrap_admin(&self, id: &ProfileId) -> Result<Profile, Error> {
        if self
            .profiles
            .find_by_id(id)
            .await
            .map_err(map_profile_error)?
            .is_some()
        {
            return Err(Error::conflict("profile already exists"));
        }
        let identity = self
            .identities
            .find_by_id(id)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::unauthorized("session no longer valid"))?;

        let profile = Profile {
            id: identity.id,
            email: identity.email,
            role: Role::Admin,
            created_at: self.clock.utc(),
        };
        self.profiles
            .insert(&profile)
            .await
            .map_err(map_profile_error)?;
        info!(profile_id = %profile.id, "admin profile bootstrapped");
        Ok(profile)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
