//! Upload coordinator
//!
//! Turns validated upload requests into stored videos. Validation always completes
//! before the first backend call, for single files and for whole batches.

use super::types::{BatchFailure, BatchReport, UploadRequest};
use super::validator::{UploadError, UploadValidator};
use reelbox_core::models::StoredVideo;
use reelbox_core::video_types::{content_type_for_key, normalize_mime_type};
use reelbox_core::{BatchPolicy, UploadLimits};
use reelbox_storage::{generate_storage_key, storage_key_with_extension, Storage};

#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    validator: UploadValidator,
    batch_policy: BatchPolicy,
}

impl UploadCoordinator {
    pub fn new(validator: UploadValidator, batch_policy: BatchPolicy) -> Self {
        Self {
            validator,
            batch_policy,
        }
    }

    pub fn from_limits(limits: &UploadLimits) -> Self {
        Self::new(UploadValidator::from_limits(limits), limits.batch_policy)
    }

    pub fn validator(&self) -> &UploadValidator {
        &self.validator
    }

    /// Validate, name and store one file.
    pub async fn upload_one(
        &self,
        request: UploadRequest,
        backend: &dyn Storage,
    ) -> Result<StoredVideo, UploadError> {
        self.validator.validate(&request)?;
        self.store(request, backend).await
    }

    /// Validate every file, then store them according to the batch policy.
    ///
    /// With [`BatchPolicy::AllOrNothing`] the first storage failure removes the files
    /// already stored by this call and is returned as the error. With
    /// [`BatchPolicy::BestEffort`] every file is attempted and failures are listed in
    /// the report, unless nothing was stored, in which case the first failure is returned.
    pub async fn upload_many(
        &self,
        requests: Vec<UploadRequest>,
        backend: &dyn Storage,
        max_count: usize,
    ) -> Result<BatchReport, UploadError> {
        if requests.is_empty() {
            return Err(UploadError::NoFiles);
        }
        if requests.len() > max_count {
            return Err(UploadError::TooManyFiles {
                count: requests.len(),
                max: max_count,
            });
        }

        match self.batch_policy {
            BatchPolicy::AllOrNothing => {
                for request in &requests {
                    self.validator.validate(request)?;
                }
                self.store_all_or_nothing(requests, backend).await
            }
            BatchPolicy::BestEffort => self.store_best_effort(requests, backend).await,
        }
    }

    async fn store_all_or_nothing(
        &self,
        requests: Vec<UploadRequest>,
        backend: &dyn Storage,
    ) -> Result<BatchReport, UploadError> {
        let mut report = BatchReport::default();

        for request in requests {
            let filename = request.original_filename.clone();
            match self.store(request, backend).await {
                Ok(stored) => report.stored.push(stored),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        original_filename = %filename,
                        stored = report.stored.len(),
                        "Batch upload failed, removing stored files"
                    );
                    Self::roll_back(&report.stored, backend).await;
                    return Err(e);
                }
            }
        }

        Ok(report)
    }

    async fn store_best_effort(
        &self,
        requests: Vec<UploadRequest>,
        backend: &dyn Storage,
    ) -> Result<BatchReport, UploadError> {
        // Invalid files are reported without touching the backend
        let mut valid = Vec::with_capacity(requests.len());
        let mut report = BatchReport::default();
        let mut first_error = None;
        for request in requests {
            match self.validator.validate(&request) {
                Ok(()) => valid.push(request),
                Err(e) => {
                    report.failures.push(failure(&request.original_filename, &e));
                    first_error = first_error.or(Some(e));
                }
            }
        }

        for request in valid {
            let filename = request.original_filename.clone();
            match self.store(request, backend).await {
                Ok(stored) => report.stored.push(stored),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        original_filename = %filename,
                        "Batch item failed"
                    );
                    report.failures.push(failure(&filename, &e));
                    first_error = first_error.or(Some(e));
                }
            }
        }

        match first_error {
            Some(e) if report.stored.is_empty() => Err(e),
            _ => Ok(report),
        }
    }

    async fn roll_back(stored: &[StoredVideo], backend: &dyn Storage) {
        for video in stored {
            if let Err(e) = backend.delete(&video.storage_key).await {
                tracing::error!(
                    error = %e,
                    key = %video.storage_key,
                    backend = %backend.backend_type(),
                    "Failed to remove file during batch rollback"
                );
            }
        }
    }

    async fn store(
        &self,
        request: UploadRequest,
        backend: &dyn Storage,
    ) -> Result<StoredVideo, UploadError> {
        let key = match self.validator.fallback_extension(&request) {
            Some(ext) => storage_key_with_extension(Some(ext)),
            None => generate_storage_key(&request.original_filename),
        };
        let content_type = match normalize_mime_type(&request.mime_type) {
            mime if mime.starts_with("video/") => mime,
            _ => content_type_for_key(&key).to_string(),
        };

        let outcome = backend
            .put(&key, request.content, &content_type)
            .await?;

        tracing::info!(
            key = %outcome.key,
            original_filename = %request.original_filename,
            backend = %backend.backend_type(),
            size_bytes = request.size_bytes,
            "Video stored"
        );

        Ok(StoredVideo {
            storage_key: outcome.key,
            source_backend: backend.backend_type(),
            public_url: outcome.url,
            size_bytes: request.size_bytes,
            original_filename: request.original_filename,
            content_type,
        })
    }
}

fn failure(original_filename: &str, error: &UploadError) -> BatchFailure {
    BatchFailure {
        original_filename: original_filename.to_string(),
        code: error.code().to_string(),
        message: error.to_string(),
    }
}
