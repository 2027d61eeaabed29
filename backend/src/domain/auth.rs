//! Authentication primitives: login credentials and authenticated principals.
//!
//! Inbound adapters build [`LoginCredentials`] from raw strings before calling
//! a port so services only ever see validated input.

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{Email, EmailValidationError, ProfileId};

/// Reasons a login payload is rejected before reaching the identity store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like an address.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl From<EmailValidationError> for LoginValidationError {
    fn from(value: EmailValidationError) -> Self {
        match value {
            EmailValidationError::Empty => Self::EmptyEmail,
            EmailValidationError::Malformed => Self::InvalidEmail,
        }
    }
}

/// Validated email and password pair.
///
/// ## Invariants
/// - `email` is normalised (trimmed and lower-cased).
/// - `password` is non-empty; surrounding whitespace is preserved so the
///   caller's secret is compared exactly.
///
/// # Examples
/// ```
/// use pitchmatch::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Event.io ", "secret").unwrap();
/// assert_eq!(creds.email().as_str(), "admin@event.io");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for identity lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Authentication record owned by the identity store.
///
/// The identity id doubles as the profile id once a profile exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: ProfileId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("not-an-email", "pw", LoginValidationError::InvalidEmail)]
    #[case("investor@fund.vc", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("a@b.io", " padded ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.password(), " padded ");
    }
}
