//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services::upload;
use reelbox_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelbox API",
        version = "0.1.0",
        description = "Video upload and retrieval. Videos are stored on local disk or in a remote blob store; listings merge both."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::video_upload::upload_videos,
        handlers::video_list::list_video_urls,
        handlers::video_list::list_videos,
        handlers::video_get::get_video,
        handlers::video_delete::delete_video,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::MessageResponse,
        handlers::video_upload::UploadResponse,
        handlers::video_upload::BatchUploadResponse,
        handlers::video_list::VideoUrlsResponse,
        handlers::video_list::VideoListResponse,
        upload::BatchFailure,
        models::StoredVideo,
        models::CatalogEntry,
        models::BackendOutage,
        reelbox_core::StorageBackend,
    )),
    tags(
        (name = "videos", description = "Upload, list, fetch and delete videos")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
