use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Compact profile projection exchanged between services.
///
/// noble-user serves it from `POST /internal/profiles/batch`; consumers use
/// it to resolve "the other participant" in matches, likes, and
/// conversation previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub credential_id: Uuid,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub primary_photo: Option<String>,
    pub is_verified: bool,
    pub is_premium: bool,
    pub last_active_at: Option<DateTime<Utc>>,
}
