use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::AuthUser;
use noble_shared::types::pagination::{Paginated, PaginationParams};
use noble_shared::types::ApiResponse;

use crate::events::publisher;
use crate::feed::FeedChange;
use crate::models::{Conversation, Message, MessageKind, NewMessage};
use crate::schema::{conversations, messages};
use crate::AppState;

/// Cap for the cached last-message summary on the conversation row.
const PREVIEW_LEN: usize = 100;

// --- Helpers ---

/// Load the conversation and verify the caller is one of its two
/// participants.
pub fn load_member_conversation(
    conn: &mut diesel::pg::PgConnection,
    conversation_id: Uuid,
    user_id: Uuid,
) -> AppResult<Conversation> {
    let conversation: Conversation = conversations::table
        .find(conversation_id)
        .first::<Conversation>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ConversationNotFound, "conversation not found"))?;

    if !conversation.is_member(user_id) {
        return Err(AppError::new(
            ErrorCode::NotConversationMember,
            "you are not a member of this conversation",
        ));
    }

    Ok(conversation)
}

fn preview_of(content: &str) -> String {
    content.chars().take(PREVIEW_LEN).collect()
}

// --- Handlers ---

/// GET /conversations/:id/messages - chronological message log, oldest first
pub async fn list_messages(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Message>>>> {
    let mut conn = checkout(&state.db)?;

    load_member_conversation(&mut conn, conversation_id, user.id)?;

    let total: i64 = messages::table
        .filter(messages::conversation_id.eq(conversation_id))
        .count()
        .get_result::<i64>(&mut conn)?;

    let items: Vec<Message> = messages::table
        .filter(messages::conversation_id.eq(conversation_id))
        .order(messages::created_at.asc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Message>(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default = "default_kind")]
    pub kind: MessageKind,
}

fn default_kind() -> MessageKind {
    MessageKind::Text
}

/// POST /conversations/:id/messages - append a message
///
/// The message row and the parent conversation's cached summary
/// (last_message, updated_at, unread_count) are written in one transaction.
pub async fn send_message(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<Message>>> {
    if req.content.trim().is_empty() {
        return Err(AppError::new(ErrorCode::EmptyMessage, "message content is required"));
    }

    let mut conn = checkout(&state.db)?;

    load_member_conversation(&mut conn, conversation_id, user.id)?;

    let message: Message = conn.transaction::<_, AppError, _>(|conn| {
        let message = diesel::insert_into(messages::table)
            .values(&NewMessage {
                conversation_id,
                sender_id: user.id,
                content: req.content.clone(),
                kind: req.kind.to_string(),
            })
            .get_result::<Message>(conn)?;

        diesel::update(conversations::table.find(conversation_id))
            .set((
                conversations::last_message.eq(preview_of(&message.content)),
                conversations::last_message_at.eq(Some(message.created_at)),
                conversations::unread_count.eq(conversations::unread_count + 1),
                conversations::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        Ok(message)
    })?;

    state.feed.notify(conversation_id, FeedChange::MessageSent);

    publisher::publish_message_sent(
        &state.rabbitmq,
        message.id,
        conversation_id,
        user.id,
        &preview_of(&message.content),
    )
    .await;

    tracing::info!(
        sender = %user.id,
        conversation = %conversation_id,
        kind = %message.kind,
        "message sent"
    );

    Ok(Json(ApiResponse::ok(message)))
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub conversation_id: Uuid,
    pub marked: usize,
}

/// POST /conversations/:id/read - mark everything the other side wrote as
/// read and reset the unread counter. Idempotent.
pub async fn mark_read(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MarkReadResponse>>> {
    let mut conn = checkout(&state.db)?;

    load_member_conversation(&mut conn, conversation_id, user.id)?;

    let marked = conn.transaction::<_, AppError, _>(|conn| {
        let marked = diesel::update(
            messages::table
                .filter(messages::conversation_id.eq(conversation_id))
                .filter(messages::sender_id.ne(user.id))
                .filter(messages::is_read.eq(false)),
        )
        .set(messages::is_read.eq(true))
        .execute(conn)?;

        diesel::update(conversations::table.find(conversation_id))
            .set(conversations::unread_count.eq(0))
            .execute(conn)?;

        Ok(marked)
    })?;

    if marked > 0 {
        state.feed.notify(conversation_id, FeedChange::ReadStateChanged);
    }

    Ok(Json(ApiResponse::ok(MarkReadResponse {
        conversation_id,
        marked,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_content() {
        let long = "x".repeat(300);
        assert_eq!(preview_of(&long).chars().count(), PREVIEW_LEN);
        assert_eq!(preview_of("hi"), "hi");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let emoji = "é".repeat(150);
        let p = preview_of(&emoji);
        assert_eq!(p.chars().count(), PREVIEW_LEN);
    }

    #[test]
    fn default_message_kind_is_text() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(req.kind, MessageKind::Text);
    }
}
