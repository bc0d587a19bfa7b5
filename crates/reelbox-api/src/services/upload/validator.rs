//! Upload validation
//!
//! Every check here runs before any storage call.

use super::types::UploadRequest;
use reelbox_core::video_types::{
    extension_for_content_type, is_video_content_type, normalized_extension,
};
use reelbox_core::{AppError, UploadLimits};
use reelbox_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Filename must not be empty")]
    InvalidFilename,

    #[error("Uploaded file is empty: {0}")]
    EmptyFile(String),

    #[error("File size is too large. Max limit is {max_mb}MB")]
    PayloadTooLarge { max_mb: usize },

    #[error("Only video files are allowed: {filename} ({mime_type})")]
    UnsupportedFileType { filename: String, mime_type: String },

    #[error("No video files uploaded")]
    NoFiles,

    #[error("Too many files: {count} uploaded, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl UploadError {
    /// Machine-readable code, as reported per item in batch reports.
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::InvalidFilename => "INVALID_FILENAME",
            UploadError::EmptyFile(_) => "EMPTY_FILE",
            UploadError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            UploadError::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            UploadError::NoFiles => "NO_FILES",
            UploadError::TooManyFiles { .. } => "TOO_MANY_FILES",
            UploadError::Storage(StorageError::InvalidFilename(_)) => "INVALID_FILENAME",
            UploadError::Storage(StorageError::PathTraversal(_)) => "PATH_TRAVERSAL",
            UploadError::Storage(StorageError::Unavailable(_))
            | UploadError::Storage(StorageError::ConfigError(_)) => "STORAGE_UNAVAILABLE",
            UploadError::Storage(_) => "STORAGE_WRITE_ERROR",
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let message = err.to_string();
        match err {
            UploadError::InvalidFilename => AppError::InvalidFilename(message),
            UploadError::EmptyFile(_) | UploadError::NoFiles => AppError::InvalidInput(message),
            UploadError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(message),
            UploadError::UnsupportedFileType { .. } => AppError::UnsupportedFileType(message),
            UploadError::TooManyFiles { count, max } => AppError::TooManyFiles { count, max },
            // Anything a backend reports during put is a failed write, except the typed cases
            UploadError::Storage(e) => match e {
                StorageError::InvalidFilename(_)
                | StorageError::PathTraversal(_)
                | StorageError::Unavailable(_)
                | StorageError::ConfigError(_) => e.into(),
                other => AppError::StorageWrite(other.to_string()),
            },
        }
    }
}

/// Checks a single file against the configured limits
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size_bytes: usize,
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size_bytes: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_limits(limits: &UploadLimits) -> Self {
        Self::new(limits.max_file_size_bytes, limits.allowed_extensions.clone())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size_bytes / 1024 / 1024
    }

    /// Filename, then emptiness, then size, then type.
    pub fn validate(&self, request: &UploadRequest) -> Result<(), UploadError> {
        if request.original_filename.trim().is_empty() {
            return Err(UploadError::InvalidFilename);
        }

        if request.size_bytes == 0 || request.content.is_empty() {
            return Err(UploadError::EmptyFile(request.original_filename.clone()));
        }

        if request.size_bytes > self.max_file_size_bytes as u64 {
            return Err(UploadError::PayloadTooLarge {
                max_mb: self.max_file_size_mb(),
            });
        }

        if !self.is_video(request) {
            return Err(UploadError::UnsupportedFileType {
                filename: request.original_filename.clone(),
                mime_type: request.mime_type.clone(),
            });
        }

        Ok(())
    }

    /// Extension taken from the MIME type when the filename's own is not an allowed one.
    ///
    /// Keeps files such as `clip` sent as `video/mp4` visible to the extension-filtered
    /// local listing. `None` means the filename decides.
    pub fn fallback_extension(&self, request: &UploadRequest) -> Option<&'static str> {
        if self.has_allowed_extension(&request.original_filename) {
            return None;
        }
        extension_for_content_type(&request.mime_type)
            .filter(|ext| self.allowed_extensions.iter().any(|allowed| allowed == ext))
    }

    fn has_allowed_extension(&self, filename: &str) -> bool {
        normalized_extension(filename)
            .map(|ext| self.allowed_extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// A `video/*` MIME type or an allowed extension is enough.
    fn is_video(&self, request: &UploadRequest) -> bool {
        is_video_content_type(&request.mime_type)
            || self.has_allowed_extension(&request.original_filename)
    }
}
