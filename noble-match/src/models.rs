use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{conversations, likes, matches, messages, swipes};

// --- SwipeDirection ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Pass,
    Like,
    SuperLike,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Like => "like",
            Self::SuperLike => "super_like",
        }
    }

    /// Only likes and super-likes count towards a mutual match.
    pub fn counts_for_match(&self) -> bool {
        matches!(self, Self::Like | Self::SuperLike)
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(Self::Pass),
            "like" => Ok(Self::Like),
            "super_like" => Ok(Self::SuperLike),
            _ => Err(format!("unknown swipe direction: {s}")),
        }
    }
}

// --- MessageKind ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Gif,
    Audio,
    Icebreaker,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Gif => "gif",
            Self::Audio => "audio",
            Self::Icebreaker => "icebreaker",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Pair normalization ---

/// Canonical order for a user pair. Matches and conversations store the
/// pair as `(user_a, user_b)` with `user_a < user_b`, so `(A,B)` and
/// `(B,A)` resolve to the same row.
pub fn normalize_pair(x: Uuid, y: Uuid) -> (Uuid, Uuid) {
    if x <= y { (x, y) } else { (y, x) }
}

// --- Swipe ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = swipes)]
pub struct Swipe {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub direction: String,
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub matched_at: DateTime<Utc>,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// The participant that is not `viewer`.
    pub fn other_user(&self, viewer: Uuid) -> Uuid {
        if self.user_a == viewer { self.user_b } else { self.user_a }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub matched_at: DateTime<Utc>,
}

// --- Like ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = likes)]
pub struct Like {
    pub id: Uuid,
    pub liker_id: Uuid,
    pub liked_id: Uuid,
    pub is_super: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub liker_id: Uuid,
    pub liked_id: Uuid,
    pub is_super: bool,
}

// --- Conversation ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = conversations)]
pub struct Conversation {
    pub id: Uuid,
    pub match_id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn is_member(&self, user: Uuid) -> bool {
        self.user_a == user || self.user_b == user
    }

    pub fn other_user(&self, viewer: Uuid) -> Uuid {
        if self.user_a == viewer { self.user_b } else { self.user_a }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = conversations)]
pub struct NewConversation {
    pub match_id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
}

// --- Message ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn direction_roundtrip() {
        for dir in [SwipeDirection::Pass, SwipeDirection::Like, SwipeDirection::SuperLike] {
            assert_eq!(SwipeDirection::from_str(dir.as_str()).unwrap(), dir);
        }
        assert!(SwipeDirection::from_str("up").is_err());
    }

    #[test]
    fn direction_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&SwipeDirection::SuperLike).unwrap(),
            "\"super_like\""
        );
        let parsed: SwipeDirection = serde_json::from_str("\"pass\"").unwrap();
        assert_eq!(parsed, SwipeDirection::Pass);
    }

    #[test]
    fn only_likes_count_for_match() {
        assert!(!SwipeDirection::Pass.counts_for_match());
        assert!(SwipeDirection::Like.counts_for_match());
        assert!(SwipeDirection::SuperLike.counts_for_match());
    }

    #[test]
    fn pair_order_is_symmetric() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(normalize_pair(a, b), normalize_pair(b, a));
        let (lo, hi) = normalize_pair(a, b);
        assert!(lo <= hi);
    }

    #[test]
    fn other_user_flips_sides() {
        let (a, b) = normalize_pair(Uuid::new_v4(), Uuid::new_v4());
        let m = Match {
            id: Uuid::now_v7(),
            user_a: a,
            user_b: b,
            matched_at: Utc::now(),
            is_new: true,
            created_at: Utc::now(),
        };
        assert_eq!(m.other_user(a), b);
        assert_eq!(m.other_user(b), a);
    }

    #[test]
    fn message_kind_strings() {
        assert_eq!(MessageKind::Icebreaker.as_str(), "icebreaker");
        let parsed: MessageKind = serde_json::from_str("\"gif\"").unwrap();
        assert_eq!(parsed, MessageKind::Gif);
    }
}
