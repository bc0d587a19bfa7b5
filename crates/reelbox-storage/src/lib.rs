//! Reelbox Storage Library
//!
//! This crate provides the storage abstraction and the two backends videos can live
//! in: a local directory and a remote blob store. It also owns the pieces that decide
//! where a file lives.
//!
//! # Storage key format
//!
//! Keys are flat, generated filenames: `video-{unix_millis}-{random}{.ext}`. They never
//! contain a separator, so a key is valid on every backend. Key generation is
//! centralized in the `keys` module.
//!
//! Client-supplied keys are never joined onto the local root directly; they go
//! through [`path_guard::resolve_within`] first.

pub mod blob;
pub mod catalog;
pub mod factory;
pub mod keys;
pub mod local;
pub mod path_guard;
pub mod traits;

// Re-export commonly used types
pub use blob::BlobStorage;
pub use catalog::{Catalog, CatalogListing, Located};
pub use factory::{create_storage, StorageSet};
pub use keys::{generate_storage_key, storage_key_with_extension};
pub use local::{LocalStorage, LocalStorageConfig};
pub use path_guard::{resolve_within, PathGuardError};
pub use reelbox_core::StorageBackend;
pub use traits::{ListedObject, PutOutcome, Storage, StorageError, StorageResult};
