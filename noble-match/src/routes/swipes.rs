use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::AuthUser;
use noble_shared::types::ApiResponse;

use crate::events::publisher;
use crate::matching::resolver::{self, MatchResult};
use crate::models::{Conversation, Match, NewLike, NewSwipe, Swipe, SwipeDirection};
use crate::schema::{likes, swipes};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordSwipeRequest {
    pub target_id: Uuid,
    pub direction: SwipeDirection,
}

#[derive(Debug, Serialize)]
pub struct MatchedPayload {
    #[serde(flatten)]
    pub matched: Match,
    pub conversation_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecordSwipeResponse {
    pub swipe: Swipe,
    /// Present when this swipe completed a mutual match.
    pub matched: Option<MatchedPayload>,
}

/// POST /swipes - record a directional swipe and check for a mutual match
///
/// Swipes are append-only: re-swiping the same target is legal and writes a
/// second record (the deck allows changing your mind). For likes and
/// super-likes the match check runs synchronously in the same transaction,
/// so the response already says whether the pair matched, and the match row
/// can never commit without its conversation.
pub async fn record_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordSwipeRequest>,
) -> AppResult<Json<ApiResponse<RecordSwipeResponse>>> {
    if req.target_id == user.id {
        return Err(AppError::new(ErrorCode::CannotSwipeSelf, "cannot swipe on yourself"));
    }

    let mut conn = checkout(&state.db)?;

    let (swipe, outcome): (Swipe, Option<MatchResult>) =
        conn.transaction::<_, AppError, _>(|conn| {
            let swipe = diesel::insert_into(swipes::table)
                .values(&NewSwipe {
                    actor_id: user.id,
                    target_id: req.target_id,
                    direction: req.direction.to_string(),
                })
                .get_result::<Swipe>(conn)?;

            if !req.direction.counts_for_match() {
                return Ok((swipe, None));
            }

            // Maintain the "who liked you" projection alongside the swipe
            diesel::insert_into(likes::table)
                .values(&NewLike {
                    liker_id: user.id,
                    liked_id: req.target_id,
                    is_super: req.direction == SwipeDirection::SuperLike,
                })
                .execute(conn)?;

            let outcome = resolver::check_for_match(conn, user.id, req.target_id)?;
            Ok((swipe, outcome))
        })?;

    tracing::info!(
        actor = %user.id,
        target = %req.target_id,
        direction = %req.direction,
        matched = outcome.is_some(),
        "swipe recorded"
    );

    match &outcome {
        Some(result) if result.created => {
            publisher::publish_match_created(
                &state.rabbitmq,
                result.matched.id,
                result.matched.user_a,
                result.matched.user_b,
            )
            .await;
        }
        Some(_) => {}
        None if req.direction.counts_for_match() => {
            publisher::publish_like_received(
                &state.rabbitmq,
                user.id,
                req.target_id,
                req.direction == SwipeDirection::SuperLike,
            )
            .await;
        }
        None => {}
    }

    let matched = outcome.map(|r| to_payload(r.matched, r.conversation));

    Ok(Json(ApiResponse::ok(RecordSwipeResponse { swipe, matched })))
}

fn to_payload(matched: Match, conversation: Conversation) -> MatchedPayload {
    MatchedPayload {
        matched,
        conversation_id: conversation.id,
    }
}
