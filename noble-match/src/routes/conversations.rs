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

use crate::models::Conversation;
use crate::schema::conversations;
use crate::services::profiles;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ConversationPreview {
    pub id: Uuid,
    pub match_id: Uuid,
    pub partner_id: Uuid,
    pub partner: Option<ProfileSummary>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /conversations - the caller's conversations, most recently active
/// first, with the other participant resolved
pub async fn list_conversations(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ConversationPreview>>>> {
    let mut conn = checkout(&state.db)?;

    let rows: Vec<Conversation> = conversations::table
        .filter(
            conversations::user_a
                .eq(user.id)
                .or(conversations::user_b.eq(user.id)),
        )
        .order(conversations::updated_at.desc())
        .load::<Conversation>(&mut conn)?;

    if rows.is_empty() {
        return Ok(Json(ApiResponse::ok(vec![])));
    }

    let partner_ids: Vec<Uuid> = rows.iter().map(|c| c.other_user(user.id)).collect();
    let summaries = profiles::fetch_summaries(
        &state.http_client,
        &state.config.user_service_url,
        &partner_ids,
    )
    .await;

    let previews = rows
        .into_iter()
        .map(|c| {
            let partner_id = c.other_user(user.id);
            ConversationPreview {
                id: c.id,
                match_id: c.match_id,
                partner: summaries.get(&partner_id).cloned(),
                partner_id,
                last_message: c.last_message,
                last_message_at: c.last_message_at,
                unread_count: c.unread_count,
                created_at: c.created_at,
                updated_at: c.updated_at,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(previews)))
}
