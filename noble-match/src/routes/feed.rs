// src/routes/feed.rs
//
// SSE live feed for one conversation.
//
//   GET /conversations/:id/feed
//   Authorization: Bearer <access token>
//
//   On connect the client receives a `messages` frame with the full
//   chronological message list, then a fresh frame every time the
//   conversation changes (message appended, read state flipped).  Frames
//   always carry the complete current list; a client that missed updates
//   is whole again on the next frame.
//
//   Closing the connection drops the stream, which drops the underlying
//   `FeedSubscription` and releases the broadcast listener.
//
// ────────────────────────────────────────────────────────────────────────────

use axum::extract::{Path, State};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use diesel::prelude::*;
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::AppResult;
use noble_shared::types::auth::AuthUser;

use crate::models::Message;
use crate::routes::messages::load_member_conversation;
use crate::schema::messages;
use crate::AppState;

/// GET /conversations/:id/feed - stream of full message-list snapshots
pub async fn conversation_feed(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
) -> AppResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    {
        let mut conn = checkout(&state.db)?;
        load_member_conversation(&mut conn, conversation_id, user.id)?;
    }

    let mut subscription = state.feed.subscribe(conversation_id);

    info!(
        conversation = %conversation_id,
        viewer = %user.id,
        "feed client connected"
    );

    let stream = async_stream::stream! {
        // Initial snapshot so the client starts from the current history.
        match snapshot(&state, conversation_id) {
            Ok(frame) => yield Ok(frame),
            Err(e) => warn!(error = %e, "feed: initial snapshot failed"),
        }

        loop {
            match subscription.recv().await {
                Ok(_change) => {
                    match snapshot(&state, conversation_id) {
                        Ok(frame) => yield Ok(frame),
                        Err(e) => warn!(error = %e, "feed: snapshot failed"),
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    // Snapshots carry the whole list, so one fresh frame
                    // covers everything that was skipped.
                    warn!("feed client lagged, skipped {n} updates");
                    match snapshot(&state, conversation_id) {
                        Ok(frame) => yield Ok(frame),
                        Err(e) => warn!(error = %e, "feed: snapshot failed"),
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    info!("feed: channel closed, ending stream");
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    ))
}

/// One SSE frame: the conversation's full message list, ascending by
/// creation time.
fn snapshot(state: &Arc<AppState>, conversation_id: Uuid) -> AppResult<SseEvent> {
    let mut conn = checkout(&state.db)?;

    let items: Vec<Message> = messages::table
        .filter(messages::conversation_id.eq(conversation_id))
        .order(messages::created_at.asc())
        .load::<Message>(&mut conn)?;

    let json = serde_json::to_string(&items)
        .map_err(|e| noble_shared::errors::AppError::internal(e.to_string()))?;

    Ok(SseEvent::default().event("messages").data(json))
}
