//! Reelbox Core Library
//!
//! This crate provides the domain models, error types, configuration, and video
//! type tables shared by the storage and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod video_types;

// Re-export commonly used types
pub use config::{BatchPolicy, Config, RemoteStorageConfig, ServerConfig, StorageConfig, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
