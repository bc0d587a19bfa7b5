//! Route configuration and setup.
//!
//! API routes live under `/api`; the health check in [health](health). Local
//! videos are also served from `/videos/{key}`, the path their public URLs point at.

mod health;

use crate::api_doc::get_openapi_spec;
use crate::constants::{API_BASE, HTTP_CONCURRENCY_LIMIT, MULTIPART_OVERHEAD_BYTES, PUBLIC_VIDEOS_PATH};
use crate::handlers::{video_delete, video_get, video_list, video_upload};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reelbox_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // A full multi-file request plus multipart framing
    let body_limit = config
        .max_file_size_bytes()
        .saturating_mul(config.max_files_per_upload())
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(body_limit_bytes = body_limit, "Request body limit configured");

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/upload", post(video_upload::upload_video))
        .route("/upload-multiple", post(video_upload::upload_videos))
        .route("/videos", get(video_list::list_video_urls))
        .route("/videos-list", get(video_list::list_videos))
        .route(
            "/videos/{key}",
            get(video_get::get_video).delete(video_delete::delete_video),
        )
        .route("/openapi.json", get(openapi_json));

    let app = Router::new()
        .nest(API_BASE, api_routes)
        .route(
            &format!("{}/{{key}}", PUBLIC_VIDEOS_PATH),
            get(video_get::get_video),
        )
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn openapi_json() -> impl IntoResponse {
    Json(get_openapi_spec())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
