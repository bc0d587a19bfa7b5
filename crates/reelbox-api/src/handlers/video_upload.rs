use crate::constants::{MULTI_UPLOAD_FIELD, SINGLE_UPLOAD_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::{BatchFailure, UploadError};
use crate::state::AppState;
use crate::utils::upload::{extract_video_parts, MultipartLimits};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reelbox_core::models::StoredVideo;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub data: StoredVideo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchUploadResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<StoredVideo>,
    /// Present only for best-effort batches with failed items
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<BatchFailure>,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "One file in the `video` field"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing file or invalid filename", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not a video file", body = ErrorResponse),
        (status = 500, description = "Storage write failed", body = ErrorResponse),
        (status = 503, description = "Upload backend not configured", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let coordinator = &state.media.coordinator;
    let limits = MultipartLimits {
        max_files: 1,
        max_file_size_bytes: coordinator.validator().max_file_size_bytes(),
    };

    let mut requests = extract_video_parts(multipart, SINGLE_UPLOAD_FIELD, limits).await?;
    let request = requests
        .pop()
        .ok_or_else(|| HttpAppError::from(UploadError::NoFiles))?;

    let stored = coordinator
        .upload_one(request, state.media.upload_target.as_ref())
        .await?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            message: "Video uploaded successfully".to_string(),
            data: stored,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/upload-multiple",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Files in repeated `videos` fields"),
    responses(
        (status = 200, description = "All videos uploaded", body = BatchUploadResponse),
        (status = 207, description = "Some videos failed (best-effort batches)", body = BatchUploadResponse),
        (status = 400, description = "No files or too many files", body = ErrorResponse),
        (status = 413, description = "A file is too large", body = ErrorResponse),
        (status = 415, description = "A file is not a video", body = ErrorResponse),
        (status = 500, description = "Storage write failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_videos"))]
pub async fn upload_videos(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let coordinator = &state.media.coordinator;
    let max_files = state.media.max_files_per_upload;
    let limits = MultipartLimits {
        max_files,
        max_file_size_bytes: coordinator.validator().max_file_size_bytes(),
    };

    let requests = extract_video_parts(multipart, MULTI_UPLOAD_FIELD, limits).await?;
    let report = coordinator
        .upload_many(requests, state.media.upload_target.as_ref(), max_files)
        .await?;

    let (status, message) = if report.is_complete() {
        (
            StatusCode::OK,
            format!("{} videos uploaded successfully", report.stored.len()),
        )
    } else {
        (
            StatusCode::MULTI_STATUS,
            format!(
                "{} videos uploaded, {} failed",
                report.stored.len(),
                report.failures.len()
            ),
        )
    };

    Ok((
        status,
        Json(BatchUploadResponse {
            success: report.is_complete(),
            message,
            data: report.stored,
            failures: report.failures,
        }),
    ))
}
