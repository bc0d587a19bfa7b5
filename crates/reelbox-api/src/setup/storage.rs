//! Storage setup and initialization

use anyhow::Result;
use reelbox_core::Config;
use reelbox_storage::{create_storage, StorageSet};

/// Build the local and remote backends and pick the upload target.
pub async fn setup_storage(config: &Config) -> Result<StorageSet> {
    tracing::info!("Initializing storage backends...");
    let storage = create_storage(config).await?;
    tracing::info!(
        upload_backend = %storage.upload_target.backend_type(),
        "Storage backends initialized successfully"
    );
    Ok(storage)
}
