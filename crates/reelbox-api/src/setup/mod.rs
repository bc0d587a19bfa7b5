//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use reelbox_core::Config;
use reelbox_storage::StorageSet;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry(&config.server.log_format);

    tracing::info!(
        environment = %config.server.environment,
        "Configuration loaded and validated successfully"
    );

    // Setup storage
    let storage = storage::setup_storage(&config)
        .await
        .context("Storage initialization failed")?;

    build_app(config, &storage)
}

/// Build state and router over already constructed backends.
pub fn build_app(config: Config, storage: &StorageSet) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config.clone(), storage));
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
