//! Asset uploads resolved to public URLs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::domain::ports::{AssetLibrary, AssetStorage, AssetStorageError};
use crate::domain::{AssetKind, AssetName, Error};

/// Largest accepted upload.
pub const MAX_ASSET_BYTES: usize = 10 * 1024 * 1024;

fn map_storage_error(error: AssetStorageError) -> Error {
    match error {
        AssetStorageError::Io { message } => {
            Error::service_unavailable(format!("asset storage unavailable: {message}"))
        }
        AssetStorageError::NotFound { name } => Error::not_found(format!("asset {name} not found")),
    }
}

/// Asset library writing through an [`AssetStorage`] adapter.
#[derive(Clone)]
pub struct AssetService<A> {
    storage: Arc<A>,
    public_base_url: Url,
}

impl<A> AssetService<A> {
    /// `public_base_url` is the externally visible origin of this service.
    pub fn new(storage: Arc<A>, public_base_url: Url) -> Self {
        Self {
            storage,
            public_base_url,
        }
    }

    /// Public URL an uploaded asset is served from.
    pub fn public_url(&self, kind: AssetKind, name: &AssetName) -> Result<String, Error> {
        self.public_base_url
            .join(&format!("/api/v1/assets/{kind}/{name}"))
            .map(String::from)
            .map_err(|err| Error::internal(format!("invalid asset url: {err}")))
    }
}

#[async_trait]
impl<A> AssetLibrary for AssetService<A>
where
    A: AssetStorage,
{
    async fn upload(
        &self,
        kind: AssetKind,
        filename: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        if bytes.is_empty() {
            return Err(Error::invalid_request("upload body must not be empty"));
        }
        if bytes.len() > MAX_ASSET_BYTES {
            return Err(Error::invalid_request(format!(
                "upload exceeds {MAX_ASSET_BYTES} bytes"
            )));
        }
        let name = AssetName::generate(kind, filename.as_deref());
        self.storage
            .store(kind, &name, &bytes)
            .await
            .map_err(map_storage_error)?;
        info!(%kind, %name, size = bytes.len(), "asset stored");
        self.public_url(kind, &name)
    }

    async fn download(&self, kind: AssetKind, name: &AssetName) -> Result<Vec<u8>, Error> {
        self.storage
            .load(kind, name)
            .await
            .map_err(map_storage_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockAssetStorage;

    fn service(storage: MockAssetStorage) -> AssetService<MockAssetStorage> {
        AssetService::new(
            Arc::new(storage),
            Url::parse("https://pitch.example.com/").expect("valid url"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn upload_returns_public_url_with_extension() {
        let mut storage = MockAssetStorage::new();
        storage
            .expect_store()
            .withf(|kind, name, bytes| {
                *kind == AssetKind::PitchDecks
                    && name.as_str().ends_with(".pdf")
                    && bytes == b"%PDF"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let url = service(storage)
            .upload(AssetKind::PitchDecks, Some("deck.pdf".into()), b"%PDF".to_vec())
            .await
            .expect("uploaded");
        assert!(url.starts_with("https://pitch.example.com/api/v1/assets/pitch-decks/deck_"));
        assert!(url.ends_with(".pdf"));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let mut storage = MockAssetStorage::new();
        storage.expect_store().never();
        let err = service(storage)
            .upload(AssetKind::Logos, None, Vec::new())
            .await
            .expect_err("empty body");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let mut storage = MockAssetStorage::new();
        storage
            .expect_load()
            .returning(|_, name| Err(AssetStorageError::not_found(name.as_str())));
        let name = AssetName::parse("logo_missing.png").expect("valid");
        let err = service(storage)
            .download(AssetKind::Logos, &name)
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
