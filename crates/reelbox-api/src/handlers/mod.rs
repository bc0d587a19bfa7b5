pub mod video_delete;
pub mod video_get;
pub mod video_list;
pub mod video_upload;

use serde::Serialize;
use utoipa::ToSchema;

/// `{ success, message }` body for operations without payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
