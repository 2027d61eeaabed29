//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing identity store, which keeps HTTP handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    ///
    /// Unknown emails and wrong passwords both yield `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error>;
}
