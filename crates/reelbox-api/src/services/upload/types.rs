//! Types used by the upload coordinator

use bytes::Bytes;
use reelbox_core::models::StoredVideo;
use serde::Serialize;
use utoipa::ToSchema;

/// One file taken from a multipart request
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub original_filename: String,
    pub mime_type: String,
    pub content: Bytes,
    pub size_bytes: u64,
}

impl UploadRequest {
    pub fn new(
        original_filename: impl Into<String>,
        mime_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        let size_bytes = content.len() as u64;
        Self {
            original_filename: original_filename.into(),
            mime_type: mime_type.into(),
            content,
            size_bytes,
        }
    }
}

/// A batch item that could not be stored
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchFailure {
    pub original_filename: String,
    pub code: String,
    pub message: String,
}

/// Outcome of a multi-file upload
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BatchReport {
    pub stored: Vec<StoredVideo>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
