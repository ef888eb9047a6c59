//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::FileStore;
use async_trait::async_trait;
use bytes::Bytes;
use guestbook_core::filename::validate_filename;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Flat directory of uploaded files.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Get the full path for a key, with path traversal protection.
    ///
    /// Runs on the blocking pool because `canonicalize` and `symlink_metadata`
    /// are synchronous.
    async fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || Self::key_path_sync(&root, &key))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    /// Synchronous key validation.
    ///
    /// Keys must be flat filenames. An existing entry (including a symlink,
    /// even a broken one) must resolve inside the storage root.
    fn key_path_sync(root: &Path, key: &str) -> StorageResult<PathBuf> {
        validate_filename(key).map_err(|e| StorageError::InvalidKey(e.to_string()))?;

        let path = root.join(key);

        match std::fs::symlink_metadata(&path) {
            Ok(meta) => {
                let root_canonical = root.canonicalize().map_err(|e| {
                    StorageError::Io(std::io::Error::new(
                        e.kind(),
                        format!("failed to canonicalize root: {e}"),
                    ))
                })?;
                let canonical = path.canonicalize().map_err(|e| {
                    if meta.file_type().is_symlink() {
                        StorageError::InvalidKey(format!(
                            "symlink target missing or invalid: {key}"
                        ))
                    } else {
                        StorageError::Io(std::io::Error::new(
                            e.kind(),
                            format!("failed to canonicalize path: {e}"),
                        ))
                    }
                })?;

                if !canonical.starts_with(&root_canonical) {
                    return Err(StorageError::InvalidKey(format!(
                        "resolved path escapes storage root: {key}"
                    )));
                }
                Ok(path)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(path),
            Err(err) => Err(StorageError::Io(std::io::Error::new(
                err.kind(),
                format!("failed to stat path: {err}"),
            ))),
        }
    }
}

fn not_found_or_io(key: &str, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(key.to_string())
    } else {
        StorageError::Io(e)
    }
}

#[async_trait]
impl FileStore for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_path(key).await?;
        fs::try_exists(&path).await.map_err(StorageError::Io)
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_path(key).await?;
        let data = fs::read(&path).await.map_err(|e| not_found_or_io(key, e))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_path(key).await?;

        // Write to a uniquely named temp file, fsync, then rename into place.
        let temp_path = self.root.join(format!(".{key}.tmp.{}", Uuid::new_v4()));
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(temp = %temp_path.display(), error = %cleanup, "failed to remove temp file");
            }
            return Err(e.into());
        }

        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key).await?;
        fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(key, e))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("storage root not accessible: {}", e),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("storage root is not a directory: {:?}", self.root),
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        let data = Bytes::from("hello world");
        backend.put("photo.png", data.clone()).await.unwrap();
        assert!(backend.exists("photo.png").await.unwrap());

        let retrieved = backend.get("photo.png").await.unwrap();
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn test_put_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        backend.put("a.png", Bytes::from("a")).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_store_generates_name_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        let name = backend
            .store(Bytes::from_static(b"\x89PNG"), "me at the beach.PNG")
            .await
            .unwrap();

        assert!(name.ends_with(".PNG"));
        assert!(dir.path().join(&name).is_file());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        // A directory in the way makes the final rename fail after the temp file is written.
        std::fs::create_dir(dir.path().join("taken.png")).unwrap();
        std::fs::write(dir.path().join("taken.png").join("inner"), "x").unwrap();

        assert!(backend.put("taken.png", Bytes::from("data")).await.is_err());

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["taken.png".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        match backend.delete("missing.png").await {
            Err(StorageError::NotFound(key)) => assert_eq!(key, "missing.png"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        backend.put("gone.jpg", Bytes::from("x")).await.unwrap();
        backend.delete("gone.jpg").await.unwrap();

        assert!(!backend.exists("gone.jpg").await.unwrap());
        assert!(matches!(
            backend.get("gone.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path()).await.unwrap();

        for key in ["../escape", "/absolute/path", "nested/key.png", "..", ""] {
            match backend.exists(key).await {
                Err(StorageError::InvalidKey(_)) => {}
                other => panic!("expected InvalidKey for {key:?}, got {other:?}"),
            }
        }

        assert!(backend.exists("valid-key.png").await.is_ok());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_symlink_traversal_rejected() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside_dir = tempfile::tempdir().unwrap();

        let outside_file = outside_dir.path().join("secret.txt");
        std::fs::write(&outside_file, "secret data").unwrap();

        let backend = FilesystemBackend::new(dir.path()).await.unwrap();
        symlink(&outside_file, dir.path().join("link.png")).unwrap();

        match backend.get("link.png").await {
            Err(StorageError::InvalidKey(msg)) => {
                assert!(msg.contains("escapes storage root"), "{msg}")
            }
            other => panic!("expected InvalidKey error, got: {other:?}"),
        }

        // Deleting through the link must not touch the outside file either.
        assert!(backend.delete("link.png").await.is_err());
        assert!(outside_file.exists());
    }

    #[tokio::test]
    async fn test_health_check_detects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        let backend = FilesystemBackend::new(&root).await.unwrap();
        backend.health_check().await.unwrap();

        std::fs::remove_dir_all(&root).unwrap();
        assert!(backend.health_check().await.is_err());
    }
}
