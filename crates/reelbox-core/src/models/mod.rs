pub mod video;

pub use video::{BackendOutage, CatalogEntry, StoredVideo};
