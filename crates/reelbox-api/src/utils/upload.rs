//! Multipart extraction for upload handlers

use crate::services::upload::UploadRequest;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use reelbox_core::AppError;

/// Limits applied while reading the request body.
#[derive(Debug, Clone, Copy)]
pub struct MultipartLimits {
    pub max_files: usize,
    pub max_file_size_bytes: usize,
}

fn multipart_error(err: MultipartError, max_file_size_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(too_large_message(max_file_size_bytes))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

fn too_large_message(max_file_size_bytes: usize) -> String {
    format!(
        "File size is too large. Max limit is {}MB",
        max_file_size_bytes / 1024 / 1024
    )
}

/// Collect every file part named `field_name`.
///
/// Parts with another name, and parts without a filename (plain form fields), are
/// skipped. Reading stops with `PayloadTooLarge` as soon as one file exceeds the size
/// limit. Once more than `max_files` files are seen the remaining parts are only
/// counted, not read, and `TooManyFiles` is returned.
pub async fn extract_video_parts(
    mut multipart: Multipart,
    field_name: &str,
    limits: MultipartLimits,
) -> Result<Vec<UploadRequest>, AppError> {
    let mut requests = Vec::new();
    let mut file_count = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limits.max_file_size_bytes))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        file_count += 1;
        if file_count > limits.max_files {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let content = read_limited(field, limits.max_file_size_bytes).await?;

        requests.push(UploadRequest::new(filename, content_type, content.freeze()));
    }

    if file_count > limits.max_files {
        return Err(AppError::TooManyFiles {
            count: file_count,
            max: limits.max_files,
        });
    }

    Ok(requests)
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<BytesMut, AppError> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if buffer.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(too_large_message(max_bytes)));
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer)
}
