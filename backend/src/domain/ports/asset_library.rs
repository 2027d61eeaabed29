//! Driving port for asset upload and download.

use async_trait::async_trait;

use crate::domain::{AssetKind, AssetName, Error};

/// Opaque upload returning a public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetLibrary: Send + Sync {
    /// Store `bytes` under a fresh name and return its public URL.
    async fn upload(
        &self,
        kind: AssetKind,
        filename: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<String, Error>;

    /// Read a stored asset.
    async fn download(&self, kind: AssetKind, name: &AssetName) -> Result<Vec<u8>, Error>;
}
