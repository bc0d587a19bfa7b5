//! Storage abstraction trait
//!
//! This module defines the Storage trait that both storage backends implement.

use crate::path_guard::PathGuardError;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reelbox_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Path escapes storage root: {0}")]
    PathTraversal(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        backend: StorageBackend,
        operation: &'static str,
    },

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether a listing may skip this backend and carry on with the others.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

impl From<PathGuardError> for StorageError {
    fn from(err: PathGuardError) -> Self {
        match err {
            PathGuardError::InvalidFilename(msg) => StorageError::InvalidFilename(msg),
            PathGuardError::PathTraversal(msg) => StorageError::PathTraversal(msg),
            PathGuardError::Io(e) => StorageError::IoError(e),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFilename(msg) => AppError::InvalidFilename(msg),
            StorageError::PathTraversal(msg) => AppError::PathTraversal(msg),
            StorageError::WriteFailed(msg) => AppError::StorageWrite(msg),
            StorageError::Unavailable(msg) => AppError::StorageUnavailable(msg),
            StorageError::NotFound(_) => AppError::NotFound("Video not found".to_string()),
            StorageError::ConfigError(msg) => AppError::StorageUnavailable(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result of a successful put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    pub key: String,
    pub url: String,
}

/// One object as reported by a backend listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    pub key: String,
    pub url: String,
    pub size_bytes: u64,
}

/// Storage abstraction trait
///
/// Both backends (local directory, remote blob store) implement this trait, so the
/// catalog and the upload coordinator never couple to a specific backend.
///
/// Keys are produced by [`crate::keys::generate_storage_key`]. Keys that come from a
/// client (read, delete) may be anything and every backend must treat them as untrusted.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` and return the key with its public URL.
    ///
    /// Fails with `WriteFailed` on I/O, network or quota errors and with `Unavailable`
    /// when the backend is not configured.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<PutOutcome>;

    /// List stored videos.
    async fn list(&self) -> StorageResult<Vec<ListedObject>>;

    /// Delete a stored video. `NotFound` when the key is absent.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Resolve a key to a readable file on disk.
    ///
    /// Only backends that hold files locally support this; the rest return
    /// `Unsupported` and are served through [`Storage::public_url`] instead.
    async fn resolve_read_path(&self, key: &str) -> StorageResult<PathBuf>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL for a key. Does not check existence.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
