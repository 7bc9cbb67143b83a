// src/recipes/handlers/uploads.rs
//! Recipe image uploads

use axum::{
    extract::{Extension, Multipart},
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthedUser;
use crate::common::{ApiError, ApiJson, AppState};
use crate::recipes::models::{UploadImageRequest, UploadedFiles, UploadedImage};
use crate::services::uploads::IncomingFile;

/// POST /api/recipes/upload - Store a base64 image
pub async fn upload_image(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    ApiJson(body): ApiJson<UploadImageRequest>,
) -> Result<Json<UploadedImage>, ApiError> {
    let stored = state.uploads.save_base64(&body.image).await?;
    info!(user_id = %authed.id, filename = %stored.filename, "Recipe image uploaded");
    Ok(Json(UploadedImage { url: stored.url }))
}

/// POST /api/recipes/upload/files - Store one or more multipart images
///
/// Accepts files under the `image` or `images` field names.
pub async fn upload_files(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<Json<UploadedFiles>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed multipart upload");
        ApiError::BadRequest("Invalid multipart body".to_string())
    })? {
        if !matches!(field.name(), Some("image") | Some("images")) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;

        files.push(IncomingFile {
            original_name,
            bytes: bytes.to_vec(),
        });
    }

    let stored = state.uploads.save_batch(files).await?;
    info!(user_id = %authed.id, count = stored.len(), "Recipe files uploaded");
    Ok(Json(UploadedFiles { files: stored }))
}
