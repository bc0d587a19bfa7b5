use crate::state::AppState;
use axum::{extract::State, Json};
use reelbox_core::models::{BackendOutage, CatalogEntry};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoUrlsResponse {
    pub videos: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoListResponse {
    pub success: bool,
    pub data: Vec<CatalogEntry>,
    /// Backends that could not be listed; their videos are missing from `data`
    pub unavailable: Vec<BackendOutage>,
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Public URLs of all videos", body = VideoUrlsResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_video_urls"))]
pub async fn list_video_urls(State(state): State<Arc<AppState>>) -> Json<VideoUrlsResponse> {
    let listing = state.media.catalog.merge().await;

    Json(VideoUrlsResponse {
        videos: listing.entries.into_iter().map(|entry| entry.url).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/api/videos-list",
    tag = "videos",
    responses(
        (status = 200, description = "All videos with their backend", body = VideoListResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(State(state): State<Arc<AppState>>) -> Json<VideoListResponse> {
    let listing = state.media.catalog.merge().await;

    Json(VideoListResponse {
        success: true,
        data: listing.entries,
        unavailable: listing.unavailable,
    })
}
