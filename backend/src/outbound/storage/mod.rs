//! Local file store for uploaded assets.
//!
//! Files live under one root directory opened through `cap_std`, with one
//! sub-directory per [`AssetKind`]. Every path is resolved relative to that
//! capability, so a name can never escape the root.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::fs::{Dir, OpenOptions};
use cap_std::ambient_authority;
use tracing::debug;

use crate::domain::ports::{AssetStorage, AssetStorageError};
use crate::domain::{AssetKind, AssetName};

const KINDS: [AssetKind; 2] = [AssetKind::Logos, AssetKind::PitchDecks];

/// Filesystem-backed [`AssetStorage`].
#[derive(Clone)]
pub struct LocalAssetStorage {
    root: Arc<Dir>,
}

impl LocalAssetStorage {
    /// Open (creating when missing) the storage root and its buckets.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        for kind in KINDS {
            root.create_dir_all(kind.as_str())?;
        }
        Ok(Self {
            root: Arc::new(root),
        })
    }

    async fn blocking<T, F>(&self, operation: F) -> Result<T, AssetStorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, AssetStorageError> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || operation(&root))
            .await
            .map_err(|err| AssetStorageError::io(err.to_string()))?
    }
}

fn map_io_error(error: io::Error, name: &AssetName) -> AssetStorageError {
    if error.kind() == io::ErrorKind::NotFound {
        AssetStorageError::not_found(name.as_str())
    } else {
        AssetStorageError::io(error.to_string())
    }
}

#[async_trait]
impl AssetStorage for LocalAssetStorage {
    async fn store(
        &self,
        kind: AssetKind,
        name: &AssetName,
        bytes: &[u8],
    ) -> Result<(), AssetStorageError> {
        let name = name.clone();
        let bytes = bytes.to_vec();
        self.blocking(move |root| {
            let bucket = root
                .open_dir(kind.as_str())
                .map_err(|err| AssetStorageError::io(err.to_string()))?;
            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            let mut file = bucket
                .open_with(name.as_str(), &options)
                .map_err(|err| AssetStorageError::io(err.to_string()))?;
            file.write_all(&bytes)
                .map_err(|err| AssetStorageError::io(err.to_string()))?;
            debug!(%kind, name = name.as_str(), size = bytes.len(), "asset stored");
            Ok(())
        })
        .await
    }

    async fn load(&self, kind: AssetKind, name: &AssetName) -> Result<Vec<u8>, AssetStorageError> {
        let name = name.clone();
        self.blocking(move |root| {
            let bucket = root
                .open_dir(kind.as_str())
                .map_err(|err| AssetStorageError::io(err.to_string()))?;
            bucket
                .read(name.as_str())
                .map_err(|err| map_io_error(err, &name))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;
    use crate::test_support::cap_fs::path_exists;

    #[fixture]
    fn root() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    #[tokio::test]
    async fn stores_and_loads_per_bucket(root: TempDir) {
        let storage = LocalAssetStorage::open(root.path()).expect("open");
        let name = AssetName::generate(AssetKind::PitchDecks, Some("deck.pdf"));

        storage
            .store(AssetKind::PitchDecks, &name, b"%PDF-1.7")
            .await
            .expect("store");

        assert!(path_exists(
            &root.path().join("pitch-decks").join(name.as_str())
        ));
        let loaded = storage
            .load(AssetKind::PitchDecks, &name)
            .await
            .expect("load");
        assert_eq!(loaded, b"%PDF-1.7");
    }

    #[rstest]
    #[tokio::test]
    async fn buckets_are_separate(root: TempDir) {
        let storage = LocalAssetStorage::open(root.path()).expect("open");
        let name = AssetName::generate(AssetKind::Logos, Some("mark.png"));
        storage
            .store(AssetKind::Logos, &name, b"png")
            .await
            .expect("store");

        let err = storage
            .load(AssetKind::PitchDecks, &name)
            .await
            .expect_err("wrong bucket");
        assert!(matches!(err, AssetStorageError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn existing_names_are_not_overwritten(root: TempDir) {
        let storage = LocalAssetStorage::open(root.path()).expect("open");
        let name = AssetName::parse("logo_fixed.png").expect("valid");
        storage
            .store(AssetKind::Logos, &name, b"first")
            .await
            .expect("store");

        let err = storage
            .store(AssetKind::Logos, &name, b"second")
            .await
            .expect_err("name taken");
        assert!(matches!(err, AssetStorageError::Io { .. }));
        assert_eq!(
            storage.load(AssetKind::Logos, &name).await.expect("load"),
            b"first"
        );
    }

    #[rstest]
    fn open_creates_missing_roots(root: TempDir) {
        let nested = root.path().join("a").join("b");
        LocalAssetStorage::open(&nested).expect("open");
        assert!(path_exists(&nested.join("logos")));
    }
}
