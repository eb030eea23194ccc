use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::AppResult;
use noble_shared::types::auth::AuthUser;
use noble_shared::types::profile::ProfileSummary;
use noble_shared::types::ApiResponse;

use crate::models::Like;
use crate::schema::likes;
use crate::services::profiles;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LikePreview {
    pub id: Uuid,
    pub liker_id: Uuid,
    pub liker: Option<ProfileSummary>,
    pub is_super: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// GET /likes - who liked the caller, newest first
pub async fn list_likes(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<LikePreview>>>> {
    let mut conn = checkout(&state.db)?;

    let rows: Vec<Like> = likes::table
        .filter(likes::liked_id.eq(user.id))
        .order(likes::created_at.desc())
        .load::<Like>(&mut conn)?;

    if rows.is_empty() {
        return Ok(Json(ApiResponse::ok(vec![])));
    }

    let liker_ids: Vec<Uuid> = rows.iter().map(|l| l.liker_id).collect();
    let summaries = profiles::fetch_summaries(
        &state.http_client,
        &state.config.user_service_url,
        &liker_ids,
    )
    .await;

    let previews = rows
        .into_iter()
        .map(|l| LikePreview {
            id: l.id,
            liker: summaries.get(&l.liker_id).cloned(),
            liker_id: l.liker_id,
            is_super: l.is_super,
            is_read: l.is_read,
            created_at: l.created_at,
        })
        .collect();

    Ok(Json(ApiResponse::ok(previews)))
}

#[derive(Debug, Serialize)]
pub struct LikesReadResponse {
    pub marked: usize,
}

/// POST /likes/read - mark all incoming likes as read. Idempotent.
pub async fn mark_likes_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<LikesReadResponse>>> {
    let mut conn = checkout(&state.db)?;

    let marked = diesel::update(
        likes::table
            .filter(likes::liked_id.eq(user.id))
            .filter(likes::is_read.eq(false)),
    )
    .set(likes::is_read.eq(true))
    .execute(&mut conn)?;

    Ok(Json(ApiResponse::ok(LikesReadResponse { marked })))
}
