use chrono::{DateTime, Datelike, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noble_shared::types::profile::ProfileSummary;

use crate::schema::profiles;

// --- Profile ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photos: serde_json::Value,
    pub interests: serde_json::Value,
    pub gender: Option<String>,
    pub gender_preference: serde_json::Value,
    pub age_min: i32,
    pub age_max: i32,
    pub max_distance_km: i32,
    pub is_verified: bool,
    pub is_premium: bool,
    pub onboarding_complete: bool,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Ordered photo URLs; element 0 is the primary photo.
    pub fn photo_urls(&self) -> Vec<String> {
        serde_json::from_value(self.photos.clone()).unwrap_or_default()
    }

    pub fn age(&self) -> Option<i32> {
        self.birth_date.map(|b| age_on(b, Utc::now().date_naive()))
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            credential_id: self.credential_id,
            display_name: self.display_name.clone(),
            age: self.age(),
            primary_photo: self.photo_urls().first().cloned(),
            is_verified: self.is_verified,
            is_premium: self.is_premium,
            last_active_at: self.last_active_at,
        }
    }
}

/// Completed years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub credential_id: Uuid,
}

#[derive(Debug, AsChangeset, Deserialize, Default)]
#[diesel(table_name = profiles)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub photos: Option<serde_json::Value>,
    pub interests: Option<serde_json::Value>,
    pub gender: Option<String>,
    pub gender_preference: Option<serde_json::Value>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub max_distance_km: Option<i32>,
}

// --- Response DTO ---

/// The profile as clients see it: raw columns plus the derived
/// `age` and `primary_photo` fields.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub photos: Vec<String>,
    pub primary_photo: Option<String>,
    pub interests: serde_json::Value,
    pub gender: Option<String>,
    pub gender_preference: serde_json::Value,
    pub age_min: i32,
    pub age_max: i32,
    pub max_distance_km: i32,
    pub is_verified: bool,
    pub is_premium: bool,
    pub onboarding_complete: bool,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileView {
    fn from(p: Profile) -> Self {
        let photos = p.photo_urls();
        Self {
            id: p.id,
            credential_id: p.credential_id,
            display_name: p.display_name,
            bio: p.bio,
            age: p.birth_date.map(|b| age_on(b, Utc::now().date_naive())),
            primary_photo: photos.first().cloned(),
            photos,
            interests: p.interests,
            gender: p.gender,
            gender_preference: p.gender_preference,
            age_min: p.age_min,
            age_max: p.age_max,
            max_distance_km: p.max_distance_km,
            is_verified: p.is_verified,
            is_premium: p.is_premium,
            onboarding_complete: p.onboarding_complete,
            last_active_at: p.last_active_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_counts_completed_years() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2026, 6, 14).unwrap()), 25);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()), 26);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2026, 6, 16).unwrap()), 26);
    }

    #[test]
    fn first_photo_is_primary() {
        let photos = serde_json::json!(["https://cdn/a.jpg", "https://cdn/b.jpg"]);
        let view_photos: Vec<String> = serde_json::from_value(photos).unwrap();
        assert_eq!(view_photos.first().unwrap(), "https://cdn/a.jpg");
    }

    #[test]
    fn malformed_photos_default_to_empty() {
        let profile_photos = serde_json::json!({"not": "an array"});
        let urls: Vec<String> = serde_json::from_value(profile_photos).unwrap_or_default();
        assert!(urls.is_empty());
    }
}
