use crate::{BlobStorage, Catalog, LocalStorage, LocalStorageConfig, Storage, StorageBackend, StorageResult};
use reelbox_core::Config;
use std::sync::Arc;

/// Every backend built from configuration.
#[derive(Clone)]
pub struct StorageSet {
    pub local: Arc<dyn Storage>,
    pub remote: Arc<dyn Storage>,
    /// Backend receiving new uploads (one of the two above)
    pub upload_target: Arc<dyn Storage>,
}

impl StorageSet {
    /// Catalog over both backends, local first.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(vec![Arc::clone(&self.local), Arc::clone(&self.remote)])
    }
}

/// Create the storage backends based on configuration
///
/// The local backend always exists. The remote backend is built from `S3_BUCKET`
/// and friends; without them it is registered in an unconfigured state, so listings
/// report it as unavailable instead of silently dropping it.
pub async fn create_storage(config: &Config) -> StorageResult<StorageSet> {
    let local: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(LocalStorageConfig {
            root: config.storage.local_path.clone(),
            base_url: config.storage.local_base_url.clone(),
            allowed_extensions: config.upload.allowed_extensions.clone(),
        })
        .await?,
    );

    let remote: Arc<dyn Storage> = match config.storage.remote {
        Some(ref remote) => Arc::new(BlobStorage::s3(remote)?),
        None => {
            tracing::info!("S3_BUCKET not set, remote storage disabled");
            Arc::new(BlobStorage::unconfigured("Remote storage is not configured"))
        }
    };

    let upload_target = match config.storage.upload_backend {
        StorageBackend::Local => Arc::clone(&local),
        StorageBackend::Remote => Arc::clone(&remote),
    };

    tracing::info!(
        local_path = %config.storage.local_path.display(),
        upload_backend = %config.storage.upload_backend,
        "Storage backends initialized"
    );

    Ok(StorageSet {
        local,
        remote,
        upload_target,
    })
}
