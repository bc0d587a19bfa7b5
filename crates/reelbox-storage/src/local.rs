use crate::keys::url_for_key;
use crate::path_guard::resolve_within;
use crate::traits::{ListedObject, PutOutcome, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reelbox_core::video_types::normalized_extension;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Settings for [`LocalStorage`], taken from the application config.
#[derive(Clone, Debug)]
pub struct LocalStorageConfig {
    /// Directory holding the videos (e.g. "./uploads/videos")
    pub root: PathBuf,
    /// Base URL the directory is served under (e.g. "http://localhost:3000/videos")
    pub base_url: String,
    /// Lowercase extensions, without the dot, shown by `list`
    pub allowed_extensions: Vec<String>,
}

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
    allowed_extensions: Vec<String>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the root directory if needed.
    pub async fn new(config: LocalStorageConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                config.root.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            root: config.root,
            base_url: config.base_url,
            allowed_extensions: config
                .allowed_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        })
    }

    fn is_listed_extension(&self, filename: &str) -> bool {
        normalized_extension(filename)
            .map(|ext| self.allowed_extensions.iter().any(|allowed| *allowed == ext))
            .unwrap_or(false)
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        Ok(resolve_within(&self.root, key)?)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> StorageResult<PutOutcome> {
        let path = self.key_to_path(key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        // Keys are unique, so an existing file means a collision and is never overwritten
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let written = async {
            file.write_all(&data).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                tracing::warn!(
                    error = %cleanup,
                    path = %path.display(),
                    "Failed to remove partially written file"
                );
            }
            tracing::error!(
                error = %e,
                path = %path.display(),
                key = %key,
                size_bytes = size,
                "Local storage write failed"
            );
            return Err(StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(PutOutcome {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn list(&self) -> StorageResult<Vec<ListedObject>> {
        let unavailable = |e: std::io::Error| {
            StorageError::Unavailable(format!(
                "Failed to read storage directory {}: {}",
                self.root.display(),
                e
            ))
        };

        let mut entries = fs::read_dir(&self.root).await.map_err(unavailable)?;
        let mut objects = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !self.is_listed_extension(&name) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // Removed between read_dir and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(unavailable(e)),
            };
            if !metadata.is_file() {
                continue;
            }

            objects.push(ListedObject {
                url: self.public_url(&name),
                key: name,
                size_bytes: metadata.len(),
            });
        }

        tracing::debug!(
            path = %self.root.display(),
            count = objects.len(),
            "Local storage listing complete"
        );

        Ok(objects)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        match fs::symlink_metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StorageError::DeleteFailed(e.to_string())),
        }

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    key = %key,
                    "Local storage delete failed"
                );
                StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn resolve_read_path(&self, key: &str) -> StorageResult<PathBuf> {
        let path = self.key_to_path(key)?;

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            Ok(_) => Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn public_url(&self, key: &str) -> String {
        url_for_key(&self.base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::video_types::DEFAULT_VIDEO_EXTENSIONS;
    use tempfile::tempdir;

    async fn storage_in(root: &std::path::Path) -> LocalStorage {
        LocalStorage::new(LocalStorageConfig {
            root: root.to_path_buf(),
            base_url: "http://localhost:3000/videos".to_string(),
            allowed_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_put_and_read() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let outcome = storage
            .put("video-1-2.mp4", Bytes::from_static(b"test data"), "video/mp4")
            .await
            .unwrap();

        assert_eq!(outcome.key, "video-1-2.mp4");
        assert_eq!(outcome.url, "http://localhost:3000/videos/video-1-2.mp4");

        let path = storage.resolve_read_path("video-1-2.mp4").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"test data");
    }

    #[tokio::test]
    async fn test_creates_missing_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("uploads").join("videos");
        let storage = storage_in(&root).await;

        assert!(root.is_dir());
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        storage
            .put("video-1-2.mp4", Bytes::from_static(b"first"), "video/mp4")
            .await
            .unwrap();
        let result = storage
            .put("video-1-2.mp4", Bytes::from_static(b"second"), "video/mp4")
            .await;

        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert_eq!(std::fs::read(dir.path().join("video-1-2.mp4")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_list_filters_by_extension() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        std::fs::write(dir.path().join("a.mp4"), b"12345").unwrap();
        std::fs::write(dir.path().join("b.MOV"), b"1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let mut listed = storage.list().await.unwrap();
        listed.sort_by(|a, b| a.key.cmp(&b.key));

        let keys: Vec<&str> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["a.mp4", "b.MOV"]);
        assert_eq!(listed[0].size_bytes, 5);
        assert_eq!(listed[0].url, "http://localhost:3000/videos/a.mp4");
    }

    #[tokio::test]
    async fn test_list_unreadable_root_is_unavailable() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir.path().join("videos")).await;
        std::fs::remove_dir(dir.path().join("videos")).unwrap();

        let result = storage.list().await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage.resolve_read_path("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));

        let result = storage
            .put("../escape.mp4", Bytes::from_static(b"x"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage.delete("video-404.mp4").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        storage
            .put("video-1-2.webm", Bytes::from_static(b"x"), "video/webm")
            .await
            .unwrap();
        assert!(storage.exists("video-1-2.webm").await.unwrap());

        storage.delete("video-1-2.webm").await.unwrap();
        assert!(!storage.exists("video-1-2.webm").await.unwrap());
        assert!(matches!(
            storage.resolve_read_path("video-1-2.webm").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let result = storage.resolve_read_path("sub").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
