//! Application state.
//!
//! Everything here is built once at startup and shared read-only across requests.

use crate::services::upload::UploadCoordinator;
use reelbox_core::Config;
use reelbox_storage::{Catalog, Storage, StorageSet};
use std::sync::Arc;

/// Backends, the merged catalog and the upload pipeline.
#[derive(Clone)]
pub struct MediaState {
    /// All backends in priority order (local first)
    pub catalog: Catalog,
    /// Backend receiving new uploads
    pub upload_target: Arc<dyn Storage>,
    pub coordinator: UploadCoordinator,
    pub max_files_per_upload: usize,
}

impl MediaState {
    pub fn new(config: &Config, storage: &StorageSet) -> Self {
        Self {
            catalog: storage.catalog(),
            upload_target: Arc::clone(&storage.upload_target),
            coordinator: UploadCoordinator::from_limits(&config.upload),
            max_files_per_upload: config.max_files_per_upload(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub media: MediaState,
}

impl AppState {
    pub fn new(config: Config, storage: &StorageSet) -> Self {
        let media = MediaState::new(&config, storage);
        Self { config, media }
    }
}
