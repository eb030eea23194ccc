use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::AuthUser;
use noble_shared::types::ApiResponse;

use crate::models::Credential;
use crate::schema::credentials;
use crate::AppState;

/// GET /me - the caller's credential
pub async fn me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Credential>>> {
    let mut conn = checkout(&state.db)?;

    let credential = credentials::table
        .find(user.id)
        .first::<Credential>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::NotFound, "credential not found"))?;

    Ok(Json(ApiResponse::ok(credential)))
}
