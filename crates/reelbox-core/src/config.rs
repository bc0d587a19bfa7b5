//! Configuration module
//!
//! This module provides configuration structures for the server, the storage
//! backends and upload limits. Everything is read once at startup and passed
//! explicitly into backend construction.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StorageBackend;
use crate::video_types::DEFAULT_VIDEO_EXTENSIONS;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_VIDEO_SIZE_MB: usize = 100;
const MAX_FILES_PER_UPLOAD: usize = 5;
const LOCAL_STORAGE_PATH: &str = "./uploads/videos";
const DEFAULT_S3_REGION: &str = "us-east-1";

/// How a multi-file upload behaves when one item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// The first failure aborts the batch and already stored items are removed.
    #[default]
    AllOrNothing,
    /// Every item is attempted independently and reported on its own.
    BestEffort,
}

impl FromStr for BatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all_or_nothing" | "atomic" => Ok(BatchPolicy::AllOrNothing),
            "best_effort" | "per_item" => Ok(BatchPolicy::BestEffort),
            _ => Err(anyhow::anyhow!("Invalid upload batch policy: {}", s)),
        }
    }
}

impl Display for BatchPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BatchPolicy::AllOrNothing => write!(f, "all_or_nothing"),
            BatchPolicy::BestEffort => write!(f, "best_effort"),
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Remote blob store settings (S3 or S3-compatible)
#[derive(Clone, Debug)]
pub struct RemoteStorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, etc.)
    pub public_base_url: Option<String>,
}

/// Storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Backend that receives new uploads
    pub upload_backend: StorageBackend,
    pub local_path: PathBuf,
    pub local_base_url: String,
    /// `None` leaves the remote backend registered but unconfigured
    pub remote: Option<RemoteStorageConfig>,
}

/// Limits applied before any storage write
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub max_files_per_upload: usize,
    pub allowed_extensions: Vec<String>,
    pub batch_policy: BatchPolicy,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_files_per_upload: MAX_FILES_PER_UPLOAD,
            allowed_extensions: default_extensions(),
            batch_policy: BatchPolicy::default(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub upload: UploadLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let port = var("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(SERVER_PORT);

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let upload_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let remote = match var("S3_BUCKET") {
            Some(bucket) => {
                let endpoint = var("S3_ENDPOINT");
                let region = var("S3_REGION")
                    .or_else(|| var("AWS_REGION"))
                    .or_else(|| endpoint.as_ref().map(|_| DEFAULT_S3_REGION.to_string()))
                    .ok_or_else(|| {
                        anyhow::anyhow!("S3_REGION or AWS_REGION must be set when S3_BUCKET is set")
                    })?;
                Some(RemoteStorageConfig {
                    bucket,
                    region,
                    endpoint,
                    public_base_url: var("REMOTE_PUBLIC_BASE_URL"),
                })
            }
            None => None,
        };

        let max_video_mb = var("MAX_VIDEO_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_VIDEO_SIZE_MB);
        let max_file_size_bytes = max_video_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            anyhow::anyhow!("MAX_VIDEO_SIZE_MB is too large: {}", max_video_mb)
        })?;

        let batch_policy = match var("UPLOAD_BATCH_POLICY") {
            Some(s) => s.parse::<BatchPolicy>()?,
            None => BatchPolicy::default(),
        };

        let config = Config {
            server: ServerConfig {
                port,
                environment,
                cors_origins,
                log_format: var("LOG_FORMAT")
                    .map(|s| s.to_lowercase())
                    .unwrap_or_else(|| "pretty".to_string()),
            },
            storage: StorageConfig {
                upload_backend,
                local_path: var("LOCAL_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(LOCAL_STORAGE_PATH)),
                local_base_url: var("LOCAL_STORAGE_BASE_URL")
                    .unwrap_or_else(|| format!("http://localhost:{}/videos", port)),
                remote,
            },
            upload: UploadLimits {
                max_file_size_bytes,
                max_files_per_upload: var("MAX_FILES_PER_UPLOAD")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(MAX_FILES_PER_UPLOAD),
                allowed_extensions: var("VIDEO_ALLOWED_EXTENSIONS")
                    .map(|s| parse_extensions(&s))
                    .unwrap_or_else(default_extensions),
                batch_policy,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than zero"));
        }

        if self.upload.max_files_per_upload == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_UPLOAD must be greater than zero"));
        }

        if self.upload.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "VIDEO_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.storage.upload_backend == StorageBackend::Remote && self.storage.remote.is_none() {
            return Err(anyhow::anyhow!(
                "S3_BUCKET must be set when using the remote storage backend"
            ));
        }

        if !self.storage.local_base_url.starts_with("http://")
            && !self.storage.local_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_BASE_URL must be an http(s) URL"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.upload.max_file_size_bytes
    }

    pub fn max_files_per_upload(&self) -> usize {
        self.upload.max_files_per_upload
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.upload.allowed_extensions
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parse `".MP4, mov,,webm"` into `["mp4", "mov", "webm"]`.
fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
