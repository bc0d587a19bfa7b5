//! Health check handler and response types.

use crate::constants::HEALTH_MESSAGE;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use reelbox_core::StorageBackend;
use reelbox_storage::{Storage, StorageError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const PROBE_KEY: &str = "health-check-non-existent-key";

#[derive(Serialize)]
pub(super) struct BackendHealth {
    pub local: String,
    pub remote: String,
}

#[derive(Serialize)]
pub(super) struct HealthCheckResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub backends: BackendHealth,
}

/// Probe one backend: "healthy", "not_configured", "timeout" or "unhealthy: {error}".
async fn check_backend(backend: &dyn Storage) -> String {
    match tokio::time::timeout(CHECK_TIMEOUT, backend.exists(PROBE_KEY)).await {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(StorageError::Unavailable(_))) => "not_configured".to_string(),
        Ok(Err(e)) => format!("unhealthy: {}", e),
        Err(_) => "timeout".to_string(),
    }
}

/// Server and backend health.
///
/// 503 only when the backend receiving uploads is unusable; a degraded secondary
/// backend is reported but does not fail the check.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut backends = BackendHealth {
        local: "unknown".to_string(),
        remote: "unknown".to_string(),
    };

    for backend in state.media.catalog.backends() {
        let status = check_backend(backend.as_ref()).await;
        match backend.backend_type() {
            StorageBackend::Local => backends.local = status,
            StorageBackend::Remote => backends.remote = status,
        }
    }

    let upload_status = match state.media.upload_target.backend_type() {
        StorageBackend::Local => &backends.local,
        StorageBackend::Remote => &backends.remote,
    };
    let upload_healthy = upload_status == "healthy";
    let all_healthy = backends.local == "healthy" && backends.remote == "healthy";

    let (status_code, status) = match (upload_healthy, all_healthy) {
        (true, true) => (StatusCode::OK, "healthy"),
        (true, false) => (StatusCode::OK, "degraded"),
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (
        status_code,
        Json(HealthCheckResponse {
            message: HEALTH_MESSAGE,
            status,
            backends,
        }),
    )
}
