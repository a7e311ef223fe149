//! Local directory of persisted source and edited images.
//!
//! Files are keyed by image id plus extension. Lookups by name never leave
//! the store's root directory.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::cache::ImageId;
use crate::error::{Error, Result};

/// Extension used for persisted images.
pub const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name under which the image `id` is persisted.
    pub fn file_name(id: &ImageId) -> String {
        format!("{}.{}", id, IMAGE_EXTENSION)
    }

    /// Write `bytes` as the artifact for `id`, creating the root if needed.
    ///
    /// The write is complete when this returns.
    pub async fn persist(&self, id: &ImageId, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(Self::file_name(id));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "persisted artifact");
        Ok(path)
    }

    /// Read the artifact called `name`.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Map `name` to a path inside the root, rejecting anything that is not a
    /// single plain file name.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let candidate = Path::new(name);
        let mut components = candidate.components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) if !name.contains(['/', '\\']) => {
                Ok(self.root.join(file))
            }
            _ => Err(Error::validation(format!("invalid file name '{}'", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persist_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested"));
        let id = ImageId::generate();

        let path = store.persist(&id, b"png-bytes").await.unwrap();
        assert_eq!(path, dir.path().join("nested").join(format!("{}.png", id)));

        let bytes = store.read(&ArtifactStore::file_name(&id)).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let err = store.read("nothing.png").await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound { name } if name == "nothing.png"));
    }

    #[test]
    fn traversal_and_nested_names_are_rejected() {
        let store = ArtifactStore::new("/srv/artifacts");
        for name in [
            "",
            ".",
            "..",
            "../secret.png",
            "a/b.png",
            "/etc/passwd",
            "..\\win.ini",
            "sub\\file.png",
        ] {
            let err = store.resolve(name).unwrap_err();
            assert!(
                matches!(err, Error::Validation { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn plain_names_resolve_inside_root() {
        let store = ArtifactStore::new("/srv/artifacts");
        assert_eq!(
            store.resolve("abc.png").unwrap(),
            PathBuf::from("/srv/artifacts/abc.png")
        );
    }
}
