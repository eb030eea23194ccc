use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::AuthUser;
use noble_shared::types::profile::ProfileSummary;
use noble_shared::types::ApiResponse;

use crate::models::{Conversation, Match};
use crate::schema::{conversations, matches};
use crate::services::profiles;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MatchPreview {
    pub id: Uuid,
    pub matched_at: DateTime<Utc>,
    pub is_new: bool,
    pub conversation_id: Option<Uuid>,
    pub partner_id: Uuid,
    pub partner: Option<ProfileSummary>,
}

/// GET /matches - the caller's matches, newest first, with partner profiles
pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchPreview>>>> {
    let mut conn = checkout(&state.db)?;

    let rows: Vec<Match> = matches::table
        .filter(matches::user_a.eq(user.id).or(matches::user_b.eq(user.id)))
        .order(matches::matched_at.desc())
        .load::<Match>(&mut conn)?;

    if rows.is_empty() {
        return Ok(Json(ApiResponse::ok(vec![])));
    }

    let match_ids: Vec<Uuid> = rows.iter().map(|m| m.id).collect();
    let convs: Vec<Conversation> = conversations::table
        .filter(conversations::match_id.eq_any(&match_ids))
        .load::<Conversation>(&mut conn)?;

    let partner_ids: Vec<Uuid> = rows.iter().map(|m| m.other_user(user.id)).collect();
    let summaries = profiles::fetch_summaries(
        &state.http_client,
        &state.config.user_service_url,
        &partner_ids,
    )
    .await;

    let previews = rows
        .into_iter()
        .map(|m| {
            let partner_id = m.other_user(user.id);
            MatchPreview {
                id: m.id,
                matched_at: m.matched_at,
                is_new: m.is_new,
                conversation_id: convs.iter().find(|c| c.match_id == m.id).map(|c| c.id),
                partner_id,
                partner: summaries.get(&partner_id).cloned(),
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(previews)))
}

/// POST /matches/:id/seen - clear the is_new flag once the match was shown.
/// Safe to call repeatedly.
pub async fn mark_match_seen(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let mut conn = checkout(&state.db)?;

    let found: Match = matches::table
        .find(match_id)
        .first::<Match>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    if found.user_a != user.id && found.user_b != user.id {
        return Err(AppError::new(ErrorCode::Forbidden, "not your match"));
    }

    if !found.is_new {
        return Ok(Json(ApiResponse::ok(found)));
    }

    let updated = diesel::update(matches::table.find(match_id))
        .set(matches::is_new.eq(false))
        .get_result::<Match>(&mut conn)?;

    Ok(Json(ApiResponse::ok(updated)))
}
