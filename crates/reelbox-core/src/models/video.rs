use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage_types::StorageBackend;

/// A video persisted by one storage backend.
///
/// Created by a successful put and immutable afterwards; it disappears when the
/// backend object is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredVideo {
    /// Backend-scoped storage key (the generated filename)
    pub storage_key: String,
    pub source_backend: StorageBackend,
    pub public_url: String,
    pub size_bytes: u64,
    /// Filename as sent by the client
    pub original_filename: String,
    pub content_type: String,
}

/// Listing projection of a stored video, recomputed on every list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    pub storage_key: String,
    pub source_backend: StorageBackend,
    pub url: String,
    pub size_bytes: u64,
}

/// A backend that could not be listed and contributed no entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BackendOutage {
    pub backend: StorageBackend,
    pub reason: String,
}
