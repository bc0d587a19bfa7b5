//! Upload coordination
//!
//! Validates incoming files, names them, and hands them to a storage backend,
//! one at a time or as a batch.

mod service;
mod types;
mod validator;

pub use service::UploadCoordinator;
pub use types::{BatchFailure, BatchReport, UploadRequest};
pub use validator::{UploadError, UploadValidator};
