//! Test helpers: build the router over a temp directory and an in-memory remote store.
//!
//! Run from workspace root: `cargo test -p reelbox-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use object_store::memory::InMemory;
use reelbox_api::setup::build_app;
use reelbox_core::{Config, StorageBackend};
use reelbox_storage::{BlobStorage, LocalStorage, LocalStorageConfig, Storage, StorageSet};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const REMOTE_BASE_URL: &str = "https://cdn.example.com/videos";

/// How the remote backend is wired for a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMode {
    /// Backed by `object_store::memory::InMemory`
    InMemory,
    /// No bucket configured; every call reports unavailable
    Unconfigured,
}

/// Test application: server plus direct handles on both backends.
pub struct TestApp {
    pub server: TestServer,
    pub local: Arc<dyn Storage>,
    pub remote: Arc<dyn Storage>,
    pub root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Video files currently in the local directory.
    pub fn local_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .expect("Failed to read storage root")
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

/// Local uploads, in-memory remote, default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(RemoteMode::InMemory, &[]).await
}

/// Build the app with extra configuration variables.
pub async fn setup_test_app_with(remote_mode: RemoteMode, vars: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let root = temp_dir.path().join("videos");

    let mut env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env.insert(
        "LOCAL_STORAGE_PATH".to_string(),
        root.display().to_string(),
    );
    let config = Config::from_lookup(|key| env.get(key).cloned()).expect("Invalid test config");

    let local: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(LocalStorageConfig {
            root: root.clone(),
            base_url: config.storage.local_base_url.clone(),
            allowed_extensions: config.upload.allowed_extensions.clone(),
        })
        .await
        .expect("Failed to create local storage"),
    );

    let remote: Arc<dyn Storage> = match remote_mode {
        RemoteMode::InMemory => Arc::new(BlobStorage::new(
            Arc::new(InMemory::new()),
            REMOTE_BASE_URL,
        )),
        RemoteMode::Unconfigured => Arc::new(BlobStorage::unconfigured(
            "Remote storage is not configured",
        )),
    };

    let upload_target = match config.storage.upload_backend {
        StorageBackend::Local => Arc::clone(&local),
        StorageBackend::Remote => Arc::clone(&remote),
    };

    let storage = StorageSet {
        local: Arc::clone(&local),
        remote: Arc::clone(&remote),
        upload_target,
    };

    let (_state, router) = build_app(config, &storage).expect("Failed to build app");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        local,
        remote,
        root: root.canonicalize().expect("Storage root missing"),
        _temp_dir: temp_dir,
    }
}
