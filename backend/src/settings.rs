//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `PITCHMATCH_*` environment variables over a
//! configuration file. Session key handling lives in
//! [`session_config`](crate::inbound::http::session_config).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{LoginCredentials, LoginValidationError, Provisioning};
use crate::inbound::ws::origin::{AllowedOrigins, OriginListError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_STORAGE_DIR: &str = "data/assets";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_SESSION_CHECK_TIMEOUT_MS: u64 = 8_000;

/// Raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid public base URL '{value}': {source}")]
    PublicBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    AllowedOrigins(#[from] OriginListError),
    #[error("bootstrap credentials rejected: {0}")]
    Bootstrap(#[from] LoginValidationError),
    #[error("bootstrap email and password must be set together")]
    PartialBootstrap,
}

/// Runtime configuration for the server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PITCHMATCH")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Externally visible origin used to build asset URLs.
    pub public_base_url: Option<String>,
    /// Root directory for uploaded assets.
    pub storage_dir: Option<PathBuf>,
    /// Privileged key enabling investor provisioning.
    pub service_key: Option<String>,
    /// WebSocket origin allow-list; a comma-separated variable yields
    /// several entries. Empty means the local development origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Bound on the profile lookup behind `GET /session`.
    #[ortho_config(default = 8000)]
    pub session_check_timeout_ms: u64,
    /// Email of an identity seeded at startup, without a profile.
    pub bootstrap_email: Option<String>,
    pub bootstrap_password: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            public_base_url: None,
            storage_dir: None,
            service_key: None,
            allowed_origins: Vec::new(),
            session_check_timeout_ms: DEFAULT_SESSION_CHECK_TIMEOUT_MS,
            bootstrap_email: None,
            bootstrap_password: None,
        }
    }
}

impl AppSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Base URL used when building public asset links.
    pub fn public_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::PublicBaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Root directory for uploaded assets.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    /// WebSocket origin allow-list; localhost:3000 when none is configured.
    pub fn allowed_origins(&self) -> Result<AllowedOrigins, SettingsError> {
        if self.allowed_origins.is_empty() {
            return Ok(AllowedOrigins::parse([DEFAULT_ALLOWED_ORIGIN])?);
        }
        Ok(AllowedOrigins::parse(&self.allowed_origins)?)
    }

    /// Upper bound on the profile lookup behind `GET /session`.
    pub fn session_check_timeout(&self) -> Duration {
        Duration::from_millis(self.session_check_timeout_ms)
    }

    /// Provisioning is enabled by any non-blank service key.
    pub fn provisioning(&self) -> Provisioning {
        match self.service_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Provisioning::Enabled,
            _ => Provisioning::Disabled,
        }
    }

    /// Credentials of the identity to seed, if configured.
    pub fn bootstrap_credentials(&self) -> Result<Option<LoginCredentials>, SettingsError> {
        match (&self.bootstrap_email, &self.bootstrap_password) {
            (Some(email), Some(password)) => {
                Ok(Some(LoginCredentials::try_from_parts(email, password)?))
            }
            (None, None) => Ok(None),
            _ => Err(SettingsError::PartialBootstrap),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 9] = [
        "PITCHMATCH_BIND_ADDR",
        "PITCHMATCH_DATABASE_URL",
        "PITCHMATCH_PUBLIC_BASE_URL",
        "PITCHMATCH_STORAGE_DIR",
        "PITCHMATCH_SERVICE_KEY",
        "PITCHMATCH_ALLOWED_ORIGINS",
        "PITCHMATCH_SESSION_CHECK_TIMEOUT_MS",
        "PITCHMATCH_BOOTSTRAP_EMAIL",
        "PITCHMATCH_BOOTSTRAP_PASSWORD",
    ];

    fn cleared_except(set: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = set
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("pitchmatch")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.storage_dir(), PathBuf::from(DEFAULT_STORAGE_DIR));
        assert_eq!(settings.provisioning(), Provisioning::Disabled);
        assert_eq!(settings.session_check_timeout(), Duration::from_secs(8));
        assert!(settings.bootstrap_credentials().expect("bootstrap").is_none());
        let origins = settings.allowed_origins().expect("origins");
        assert!(origins.allows(&Url::parse("http://localhost:3000").expect("url")));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("PITCHMATCH_BIND_ADDR", "127.0.0.1:9090"),
            ("PITCHMATCH_DATABASE_URL", "postgres://localhost/pitchmatch"),
            ("PITCHMATCH_SERVICE_KEY", "s3cret"),
            (
                "PITCHMATCH_ALLOWED_ORIGINS",
                "https://pitchmatch.example,https://*.pitchmatch.example",
            ),
            ("PITCHMATCH_SESSION_CHECK_TIMEOUT_MS", "250"),
            ("PITCHMATCH_BOOTSTRAP_EMAIL", "founder@pitchmatch.example"),
            ("PITCHMATCH_BOOTSTRAP_PASSWORD", "hunter22"),
        ]));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9090
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/pitchmatch")
        );
        assert_eq!(settings.provisioning(), Provisioning::Enabled);
        assert_eq!(settings.session_check_timeout(), Duration::from_millis(250));
        let origins = settings.allowed_origins().expect("origins");
        assert!(origins.allows(&Url::parse("https://live.pitchmatch.example").expect("url")));
        let credentials = settings
            .bootstrap_credentials()
            .expect("bootstrap")
            .expect("configured");
        assert_eq!(credentials.email().as_str(), "founder@pitchmatch.example");
    }

    #[rstest]
    fn comma_separated_origins_load_as_a_list() {
        let _guard = lock_env(cleared_except(&[(
            "PITCHMATCH_ALLOWED_ORIGINS",
            "https://a.pitchmatch.example,https://b.pitchmatch.example",
        )]));

        let settings = load();
        assert_eq!(settings.allowed_origins.len(), 2);
        let origins = settings.allowed_origins().expect("origins");
        for origin in ["https://a.pitchmatch.example", "https://b.pitchmatch.example"] {
            assert!(origins.allows(&Url::parse(origin).expect("url")), "{origin}");
        }
        assert!(!origins.allows(&Url::parse("http://localhost:3000").expect("url")));
    }

    #[rstest]
    #[case(Some("  "), Provisioning::Disabled)]
    #[case(Some("key"), Provisioning::Enabled)]
    #[case(None, Provisioning::Disabled)]
    fn provisioning_follows_the_service_key(
        #[case] key: Option<&str>,
        #[case] expected: Provisioning,
    ) {
        let settings = AppSettings {
            service_key: key.map(str::to_owned),
            ..AppSettings::default()
        };
        assert_eq!(settings.provisioning(), expected);
    }

    #[rstest]
    fn half_configured_bootstrap_is_rejected() {
        let settings = AppSettings {
            bootstrap_email: Some("founder@pitchmatch.example".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.bootstrap_credentials(),
            Err(SettingsError::PartialBootstrap)
        ));
    }

    #[rstest]
    #[case(Some("not-an-addr"), None)]
    #[case(None, Some("not a url"))]
    fn malformed_values_are_reported(
        #[case] bind_addr: Option<&str>,
        #[case] base_url: Option<&str>,
    ) {
        let settings = AppSettings {
            bind_addr: bind_addr.map(str::to_owned),
            public_base_url: base_url.map(str::to_owned),
            ..AppSettings::default()
        };
        let failed = settings.bind_addr().is_err() || settings.public_base_url().is_err();
        assert!(failed);
    }
}
