use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::AuthUser;
use noble_shared::types::ApiResponse;

use crate::models::Profile;
use crate::schema::profiles;
use crate::AppState;

const MAX_PHOTOS: usize = 9;

#[derive(Debug, Serialize)]
pub struct PhotoUploadResponse {
    pub photo_url: String,
    pub photos: Vec<String>,
}

/// POST /photo - upload a photo and append it to the profile's photo list.
/// The first uploaded photo becomes the primary photo.
pub async fn upload_photo(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<PhotoUploadResponse>>> {
    let mut conn = checkout(&state.db)?;

    let profile = profiles::table
        .filter(profiles::credential_id.eq(user.id))
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let mut photos = profile.photo_urls();
    if photos.len() >= MAX_PHOTOS {
        return Err(AppError::new(
            ErrorCode::PhotoUploadFailed,
            format!("profile already has the maximum of {MAX_PHOTOS} photos"),
        ));
    }

    // Read the file from multipart
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::new(ErrorCode::PhotoUploadFailed, format!("failed to read multipart: {e}")))?
        .ok_or_else(|| AppError::new(ErrorCode::PhotoUploadFailed, "no file provided"))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let ext = match content_type.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => {
            return Err(AppError::new(
                ErrorCode::PhotoUploadFailed,
                "unsupported image format, accepted: jpeg, png, webp",
            ));
        }
    };

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::new(ErrorCode::PhotoUploadFailed, format!("failed to read file data: {e}")))?;

    let file_id = Uuid::now_v7();
    let key = format!("profiles/{}/{}.{}", profile.id, file_id, ext);

    let photo_url = state
        .minio
        .upload(&key, data.to_vec(), &content_type)
        .await
        .map_err(|e| AppError::new(ErrorCode::PhotoUploadFailed, e))?;

    photos.push(photo_url.clone());
    let photos_json = serde_json::to_value(&photos)
        .map_err(|e| AppError::internal(e.to_string()))?;

    diesel::update(profiles::table.find(profile.id))
        .set((
            profiles::photos.eq(&photos_json),
            profiles::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

    tracing::info!(
        profile_id = %profile.id,
        photo_url = %photo_url,
        count = photos.len(),
        "profile photo uploaded"
    );

    Ok(Json(ApiResponse::ok(PhotoUploadResponse { photo_url, photos })))
}

#[derive(Debug, Deserialize)]
pub struct DeletePhotoRequest {
    pub photo_url: String,
}

/// DELETE /photo - remove a photo from the profile's list
pub async fn delete_photo(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeletePhotoRequest>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let mut conn = checkout(&state.db)?;

    let profile = profiles::table
        .filter(profiles::credential_id.eq(user.id))
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let mut photos = profile.photo_urls();
    let before = photos.len();
    photos.retain(|url| url != &req.photo_url);

    if photos.len() == before {
        return Err(AppError::new(ErrorCode::PhotoNotFound, "photo not found on profile"));
    }

    let photos_json = serde_json::to_value(&photos)
        .map_err(|e| AppError::internal(e.to_string()))?;

    diesel::update(profiles::table.find(profile.id))
        .set((
            profiles::photos.eq(&photos_json),
            profiles::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;

    if let Err(e) = state.minio.delete_by_url(&req.photo_url).await {
        tracing::warn!(error = %e, "failed to delete photo object");
    }

    Ok(Json(ApiResponse::ok(photos)))
}
