//! Port for opaque file storage.

use async_trait::async_trait;

use crate::domain::{AssetKind, AssetName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by asset storage adapters.
    pub enum AssetStorageError {
        /// The backing store rejected a read or write.
        Io { message: String } => "asset storage failed: {message}",
        /// No asset with that name exists.
        NotFound { name: String } => "asset {name} not found",
    }
}

/// Port for storing and reading uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Write `bytes` under `name`, replacing nothing: names are unique.
    async fn store(
        &self,
        kind: AssetKind,
        name: &AssetName,
        bytes: &[u8],
    ) -> Result<(), AssetStorageError>;

    /// Read a stored asset back.
    async fn load(&self, kind: AssetKind, name: &AssetName) -> Result<Vec<u8>, AssetStorageError>;
}
