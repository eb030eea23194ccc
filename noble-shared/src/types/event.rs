use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `noble.{domain}.{entity}.{action}`
/// Example: `noble.match.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Auth events
    pub const AUTH_USER_VERIFIED: &str = "noble.auth.user.verified";

    // Profile events
    pub const USER_PROFILE_UPDATED: &str = "noble.user.profile.updated";
    pub const USER_ONBOARDING_COMPLETED: &str = "noble.user.profile.onboarding_completed";

    // Swipe/match events
    pub const MATCH_LIKE_RECEIVED: &str = "noble.match.like.received";
    pub const MATCH_CREATED: &str = "noble.match.match.created";

    // Messaging events
    pub const MESSAGE_SENT: &str = "noble.match.message.sent";
}

/// Typed event payloads
pub mod payloads {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserVerified {
        pub credential_id: Uuid,
        pub phone_number: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileUpdated {
        pub profile_id: Uuid,
        pub credential_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct OnboardingCompleted {
        pub credential_id: Uuid,
        pub display_name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LikeReceived {
        pub liker_id: Uuid,
        pub liked_id: Uuid,
        pub is_super: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_a: Uuid,
        pub user_b: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MessageSent {
        pub message_id: Uuid,
        pub conversation_id: Uuid,
        pub sender_id: Uuid,
        pub preview: String,
    }
}
