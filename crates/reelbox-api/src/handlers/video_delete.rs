use super::MessageResponse;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use reelbox_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/videos/{key}",
    tag = "videos",
    params(
        ("key" = String, Path, description = "Storage key of the video")
    ),
    responses(
        (status = 200, description = "Video deleted", body = MessageResponse),
        (status = 403, description = "Key escapes the storage root", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Delete failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_video"))]
pub async fn delete_video(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let located = state
        .media
        .catalog
        .locate(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    located.backend.delete(&located.key).await?;

    tracing::info!(
        key = %located.key,
        backend = %located.backend.backend_type(),
        "Video deleted"
    );

    Ok(Json(MessageResponse::ok("Video deleted successfully")))
}
