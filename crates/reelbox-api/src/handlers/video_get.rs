//! Video retrieval.
//!
//! Backends are tried in priority order. Files on local disk are streamed; videos
//! in the remote store are answered with a redirect to their public URL.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use reelbox_core::video_types::content_type_for_key;
use reelbox_core::AppError;
use reelbox_storage::{Storage, StorageError};
use std::path::Path as FsPath;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

#[utoipa::path(
    get,
    path = "/api/videos/{key}",
    tag = "videos",
    params(
        ("key" = String, Path, description = "Storage key of the video")
    ),
    responses(
        (status = 200, description = "Video file streamed from local storage"),
        (status = 307, description = "Redirect to the remote store"),
        (status = 400, description = "Invalid filename", body = ErrorResponse),
        (status = 403, description = "Key escapes the storage root", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_video"))]
pub async fn get_video(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    for backend in state.media.catalog.backends() {
        match backend.resolve_read_path(&key).await {
            Ok(path) => return stream_file(&path, &key).await,
            Err(StorageError::Unsupported { .. }) => {
                if let Some(response) = redirect_if_present(backend.as_ref(), &key).await? {
                    return Ok(response);
                }
            }
            Err(StorageError::NotFound(_)) | Err(StorageError::Unavailable(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::NotFound("Video not found".to_string()).into())
}

async fn redirect_if_present(
    backend: &dyn Storage,
    key: &str,
) -> Result<Option<Response>, HttpAppError> {
    match backend.exists(key).await {
        Ok(true) => {
            let url = backend.public_url(key);
            tracing::debug!(key = %key, url = %url, "Redirecting to remote store");
            Ok(Some(Redirect::temporary(&url).into_response()))
        }
        Ok(false) | Err(StorageError::Unavailable(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn stream_file(path: &FsPath, key: &str) -> Result<Response, HttpAppError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound("Video not found".to_string())
        } else {
            AppError::Internal(format!("Failed to open video: {}", e))
        }
    })?;
    let size = file
        .metadata()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read video metadata: {}", e)))?
        .len();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_key(key))
        .header(header::CONTENT_LENGTH, size)
        .header(header::ACCEPT_RANGES, "none")
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
