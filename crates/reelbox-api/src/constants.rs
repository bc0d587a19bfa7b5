//! API constants
//!
//! Route prefixes and the multipart field names clients upload under.

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Path the local directory is served under, outside the API prefix
pub const PUBLIC_VIDEOS_PATH: &str = "/videos";

/// Multipart field for single uploads
pub const SINGLE_UPLOAD_FIELD: &str = "video";

/// Multipart field for multi-file uploads
pub const MULTI_UPLOAD_FIELD: &str = "videos";

/// Room for multipart boundaries and part headers on top of the file payloads
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Upper bound on requests handled at once
pub const HTTP_CONCURRENCY_LIMIT: usize = 1024;

pub const HEALTH_MESSAGE: &str = "Video upload server is running";
