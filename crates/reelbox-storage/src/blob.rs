use crate::keys::url_for_key;
use crate::traits::{ListedObject, PutOutcome, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectMeta, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
};
use reelbox_core::RemoteStorageConfig;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
enum BlobState {
    Ready(Arc<dyn ObjectStore>),
    /// Registered so listings can report it, but every call fails with `Unavailable`
    Unconfigured(String),
}

/// Remote blob storage implementation
///
/// Wraps any [`ObjectStore`]: S3 or an S3-compatible provider in production,
/// `InMemory` in tests.
#[derive(Clone)]
pub struct BlobStorage {
    state: BlobState,
    public_base_url: String,
}

impl BlobStorage {
    /// Create a blob backend over an existing object store.
    ///
    /// `public_base_url` is the prefix of the URLs clients are redirected to.
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        BlobStorage {
            state: BlobState::Ready(store),
            public_base_url: public_base_url.into(),
        }
    }

    /// A remote backend with no credentials or bucket behind it.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        BlobStorage {
            state: BlobState::Unconfigured(reason.into()),
            public_base_url: String::new(),
        }
    }

    /// Build an S3 (or S3-compatible) backend.
    ///
    /// Credentials come from the usual AWS environment variables; bucket, region and
    /// endpoint from the config. With a custom endpoint (MinIO, R2, ...) plain http
    /// is allowed when the endpoint uses it.
    pub fn s3(config: &RemoteStorageConfig) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone());

        if let Some(ref endpoint) = config.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base_url = config.public_base_url.clone().unwrap_or_else(|| {
            match config.endpoint {
                // Path-style for S3-compatible providers: {endpoint}/{bucket}
                Some(ref endpoint) => {
                    format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket)
                }
                None => format!(
                    "https://{}.s3.{}.amazonaws.com",
                    config.bucket, config.region
                ),
            }
        });

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "Remote blob storage configured"
        );

        Ok(BlobStorage::new(Arc::new(store), public_base_url))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, BlobState::Ready(_))
    }

    fn store(&self) -> StorageResult<&Arc<dyn ObjectStore>> {
        match &self.state {
            BlobState::Ready(store) => Ok(store),
            BlobState::Unconfigured(reason) => Err(StorageError::Unavailable(reason.clone())),
        }
    }

    /// Validate a client-supplied key and turn it into an object path.
    fn object_path(key: &str) -> StorageResult<Path> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StorageError::InvalidFilename(
                "Filename must not be empty".to_string(),
            ));
        }
        if key.starts_with('/') || key.split(['/', '\\']).any(|part| part == "..") {
            return Err(StorageError::PathTraversal(key.to_string()));
        }
        Path::parse(key).map_err(|e| StorageError::InvalidFilename(e.to_string()))
    }

    fn listed(&self, meta: ObjectMeta) -> ListedObject {
        let key = meta.location.to_string();
        ListedObject {
            url: self.public_url(&key),
            key,
            size_bytes: meta.size as u64,
        }
    }
}

#[async_trait]
impl Storage for BlobStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<PutOutcome> {
        let store = self.store()?;
        let location = Self::object_path(key)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let mut options = PutOptions::default();
        options.attributes = attributes;

        store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob upload failed"
                );
                StorageError::WriteFailed(e.to_string())
            })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob upload successful"
        );

        Ok(PutOutcome {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn list(&self) -> StorageResult<Vec<ListedObject>> {
        let store = self.store()?;
        let start = std::time::Instant::now();

        let metas: Vec<ObjectMeta> = store
            .list(None)
            .try_collect()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        tracing::debug!(
            count = metas.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob listing complete"
        );

        Ok(metas.into_iter().map(|meta| self.listed(meta)).collect())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let store = self.store()?;
        let location = Self::object_path(key)?;
        let start = std::time::Instant::now();

        // Most object stores report success for absent keys, so check first
        match store.head(&location).await {
            Ok(_) => {}
            Err(ObjectStoreError::NotFound { .. }) => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StorageError::BackendError(e.to_string())),
        }

        store.delete(&location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Blob delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob delete successful"
        );

        Ok(())
    }

    async fn resolve_read_path(&self, _key: &str) -> StorageResult<PathBuf> {
        Err(StorageError::Unsupported {
            backend: StorageBackend::Remote,
            operation: "resolve_read_path",
        })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let store = self.store()?;
        let location = Self::object_path(key)?;
        match store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        url_for_key(&self.public_base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Remote
    }
}
