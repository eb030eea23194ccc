use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use noble_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{normalize_pair, Conversation, Match, NewConversation, NewMatch};
use crate::schema::{conversations, matches, swipes};

/// Directions that satisfy the reciprocity check.
const MATCHING_DIRECTIONS: [&str; 2] = ["like", "super_like"];

/// The result of a successful match check.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matched: Match,
    pub conversation: Conversation,
    /// False when the pair was already matched before this call.
    pub created: bool,
}

/// Check whether `target_id` has already liked `actor_id` back, and if so
/// ensure the match and its conversation exist.
///
/// Runs inside the caller's transaction: the match row and the conversation
/// row commit together or not at all. The check is idempotent; an existing
/// match for the pair is returned as-is, never duplicated. Concurrent
/// racers on the same pair are serialized by the unique `(user_a, user_b)`
/// index.
pub fn check_for_match(
    conn: &mut PgConnection,
    actor_id: Uuid,
    target_id: Uuid,
) -> AppResult<Option<MatchResult>> {
    // Reciprocity: has the other side liked us? The swapped actor/target
    // query makes (A,B) and (B,A) equivalent.
    let reciprocated: Option<Uuid> = swipes::table
        .filter(swipes::actor_id.eq(target_id))
        .filter(swipes::target_id.eq(actor_id))
        .filter(swipes::direction.eq_any(MATCHING_DIRECTIONS))
        .select(swipes::id)
        .first::<Uuid>(conn)
        .optional()?;

    if reciprocated.is_none() {
        return Ok(None);
    }

    let (user_a, user_b) = normalize_pair(actor_id, target_id);

    if let Some(existing) = find_match(conn, user_a, user_b)? {
        let conversation = ensure_conversation(conn, &existing)?;
        return Ok(Some(MatchResult {
            matched: existing,
            conversation,
            created: false,
        }));
    }

    let new_match = NewMatch {
        user_a,
        user_b,
        matched_at: Utc::now(),
    };

    let inserted = diesel::insert_into(matches::table)
        .values(&new_match)
        .get_result::<Match>(conn);

    let matched = match inserted {
        Ok(m) => m,
        // Another swipe on the same pair won the race; use its row.
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            find_match(conn, user_a, user_b)?.ok_or_else(|| {
                AppError::new(ErrorCode::AlreadyMatched, "match exists for this pair")
            })?
        }
        Err(e) => return Err(e.into()),
    };

    let conversation = ensure_conversation(conn, &matched)?;

    tracing::info!(
        match_id = %matched.id,
        user_a = %matched.user_a,
        user_b = %matched.user_b,
        "mutual match created"
    );

    Ok(Some(MatchResult {
        matched,
        conversation,
        created: true,
    }))
}

fn find_match(conn: &mut PgConnection, user_a: Uuid, user_b: Uuid) -> AppResult<Option<Match>> {
    let found = matches::table
        .filter(matches::user_a.eq(user_a))
        .filter(matches::user_b.eq(user_b))
        .first::<Match>(conn)
        .optional()?;
    Ok(found)
}

/// Fetch the match's conversation, creating it if absent. The create path
/// only runs for rows written before conversations became part of the match
/// transaction; it doubles as the reconciliation pass for them.
fn ensure_conversation(conn: &mut PgConnection, matched: &Match) -> AppResult<Conversation> {
    let existing = conversations::table
        .filter(conversations::match_id.eq(matched.id))
        .first::<Conversation>(conn)
        .optional()?;

    if let Some(c) = existing {
        return Ok(c);
    }

    let new_conversation = NewConversation {
        match_id: matched.id,
        user_a: matched.user_a,
        user_b: matched.user_b,
    };

    let conversation = diesel::insert_into(conversations::table)
        .values(&new_conversation)
        .get_result::<Conversation>(conn)?;

    Ok(conversation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwipeDirection;

    #[test]
    fn matching_directions_cover_likes_only() {
        for dir in [SwipeDirection::Like, SwipeDirection::SuperLike] {
            assert!(MATCHING_DIRECTIONS.contains(&dir.as_str()));
        }
        assert!(!MATCHING_DIRECTIONS.contains(&SwipeDirection::Pass.as_str()));
    }
}
