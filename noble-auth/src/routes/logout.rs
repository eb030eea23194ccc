use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

use noble_shared::clients::db::checkout;
use noble_shared::errors::AppResult;
use noble_shared::types::auth::AuthUser;
use noble_shared::types::ApiResponse;

use crate::schema::refresh_tokens;
use crate::services::token_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// POST /logout - revoke the presented refresh token. Safe to repeat.
pub async fn logout(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    let token_hash = token_service::hash_token(&req.refresh_token);
    let mut conn = checkout(&state.db)?;

    let revoked = diesel::update(
        refresh_tokens::table
            .filter(refresh_tokens::credential_id.eq(user.id))
            .filter(refresh_tokens::token_hash.eq(&token_hash))
            .filter(refresh_tokens::revoked_at.is_null()),
    )
    .set(refresh_tokens::revoked_at.eq(Some(chrono::Utc::now())))
    .execute(&mut conn)?;

    if revoked > 0 {
        tracing::info!(credential_id = %user.id, "session closed");
    }

    Ok(Json(ApiResponse::ok("logged out")))
}
