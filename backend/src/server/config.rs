//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use pitchmatch::domain::{LoginCredentials, Provisioning};
use pitchmatch::inbound::http::session_config::SessionSettings;
use pitchmatch::inbound::ws::origin::AllowedOrigins;
use pitchmatch::outbound::persistence::DbPool;
use pitchmatch::settings::{AppSettings, SettingsError};
use url::Url;

/// Everything the server needs once settings have been validated.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) public_base_url: Url,
    pub(crate) storage_dir: PathBuf,
    pub(crate) provisioning: Provisioning,
    pub(crate) origins: AllowedOrigins,
    pub(crate) session_check_timeout: Duration,
    pub(crate) bootstrap: Option<LoginCredentials>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Validate loaded settings. In-memory adapters are used until
    /// [`Self::with_db_pool`] attaches a database.
    pub fn from_settings(
        settings: &AppSettings,
        session: SessionSettings,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            session,
            bind_addr: settings.bind_addr()?,
            public_base_url: settings.public_base_url()?,
            storage_dir: settings.storage_dir(),
            provisioning: settings.provisioning(),
            origins: settings.allowed_origins()?,
            session_check_timeout: settings.session_check_timeout(),
            bootstrap: settings.bootstrap_credentials()?,
            db_pool: None,
        })
    }

    /// Attach a database connection pool for the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
