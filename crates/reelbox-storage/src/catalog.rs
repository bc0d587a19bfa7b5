//! Merged view over every configured backend.
//!
//! Entries are tagged with the backend they came from and never deduplicated: the
//! same key in two backends is two distinct videos. Order is backend priority
//! (the order backends were registered in), then key ascending.

use crate::traits::{Storage, StorageError, StorageResult};
use futures::future::join_all;
use reelbox_core::models::{BackendOutage, CatalogEntry};
use std::sync::Arc;

/// Result of a merge: the entries that could be listed and the backends that could not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogListing {
    pub entries: Vec<CatalogEntry>,
    pub unavailable: Vec<BackendOutage>,
}

/// The backend holding a key.
#[derive(Clone)]
pub struct Located {
    pub backend: Arc<dyn Storage>,
    pub key: String,
}

impl std::fmt::Debug for Located {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Located")
            .field("backend", &self.backend.backend_type())
            .field("key", &self.key)
            .finish()
    }
}

#[derive(Clone)]
pub struct Catalog {
    backends: Vec<Arc<dyn Storage>>,
}

impl Catalog {
    /// Backends in priority order.
    pub fn new(backends: Vec<Arc<dyn Storage>>) -> Self {
        Catalog { backends }
    }

    pub fn backends(&self) -> &[Arc<dyn Storage>] {
        &self.backends
    }

    /// List every backend concurrently and merge the results.
    ///
    /// A failing backend contributes no entries and is reported in
    /// [`CatalogListing::unavailable`]; the merge itself never fails.
    pub async fn merge(&self) -> CatalogListing {
        let start = std::time::Instant::now();
        let results = join_all(self.backends.iter().map(|backend| backend.list())).await;

        let mut listing = CatalogListing::default();

        for (backend, result) in self.backends.iter().zip(results) {
            let source = backend.backend_type();
            match result {
                Ok(mut objects) => {
                    objects.sort_by(|a, b| a.key.cmp(&b.key));
                    listing
                        .entries
                        .extend(objects.into_iter().map(|object| CatalogEntry {
                            storage_key: object.key,
                            source_backend: source,
                            url: object.url,
                            size_bytes: object.size_bytes,
                        }));
                }
                Err(e) => {
                    tracing::warn!(
                        backend = %source,
                        error = %e,
                        recoverable = e.is_recoverable(),
                        "Backend listing failed, continuing without it"
                    );
                    listing.unavailable.push(BackendOutage {
                        backend: source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            entries = listing.entries.len(),
            unavailable = listing.unavailable.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Catalog merge complete"
        );

        listing
    }

    /// Find the first backend, in priority order, holding `key`.
    ///
    /// Unavailable backends are skipped. Invalid or traversing keys are returned as
    /// errors so callers can tell them apart from a plain miss.
    pub async fn locate(&self, key: &str) -> StorageResult<Option<Located>> {
        for backend in &self.backends {
            match backend.exists(key).await {
                Ok(true) => {
                    return Ok(Some(Located {
                        backend: Arc::clone(backend),
                        key: key.to_string(),
                    }))
                }
                Ok(false) => {}
                Err(StorageError::Unavailable(reason)) => {
                    tracing::debug!(
                        backend = %backend.backend_type(),
                        reason = %reason,
                        "Skipping unavailable backend during lookup"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}
