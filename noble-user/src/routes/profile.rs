use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::AuthUser;
use noble_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{age_on, Profile, ProfileView, UpdateProfile};
use crate::schema::profiles;
use crate::AppState;

const MIN_AGE: i32 = 18;

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    let mut conn = checkout(&state.db)?;

    let profile = profiles::table
        .filter(profiles::credential_id.eq(user.id))
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile.into())))
}

// --- PATCH /me ---

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfile>,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    if let Some(name) = payload.display_name.as_deref() {
        validate_display_name(name)?;
    }

    let mut conn = checkout(&state.db)?;

    let profile = profiles::table
        .filter(profiles::credential_id.eq(user.id))
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let updated = diesel::update(profiles::table.find(profile.id))
        .set((
            &payload,
            profiles::last_active_at.eq(Some(Utc::now())),
            profiles::updated_at.eq(Utc::now()),
        ))
        .get_result::<Profile>(&mut conn)?;

    publisher::publish_profile_updated(&state.rabbitmq, updated.id, updated.credential_id).await;

    Ok(Json(ApiResponse::ok(updated.into())))
}

// --- POST /onboarding ---

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub display_name: String,
    pub birth_date: String,
    pub gender: String,
    pub gender_preference: Vec<String>,
    pub bio: Option<String>,
    pub interests: Vec<String>,
}

pub async fn complete_onboarding(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<OnboardingRequest>,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    validate_display_name(&req.display_name)?;

    let birth_date = NaiveDate::parse_from_str(&req.birth_date, "%Y-%m-%d")
        .map_err(|_| AppError::new(ErrorCode::ValidationError, "invalid birth_date format, expected YYYY-MM-DD"))?;

    // The only place the age floor is checked
    if age_on(birth_date, Utc::now().date_naive()) < MIN_AGE {
        return Err(AppError::new(
            ErrorCode::UnderageBirthDate,
            "you must be at least 18 years old",
        ));
    }

    let mut conn = checkout(&state.db)?;

    let name_taken: bool = profiles::table
        .filter(profiles::display_name.eq(&req.display_name))
        .filter(profiles::credential_id.ne(user.id))
        .count()
        .get_result::<i64>(&mut conn)
        .map(|c| c > 0)
        .unwrap_or(false);

    if name_taken {
        return Err(AppError::new(ErrorCode::DisplayNameTaken, "display name is already taken"));
    }

    let profile = profiles::table
        .filter(profiles::credential_id.eq(user.id))
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let interests_json = serde_json::to_value(&req.interests)
        .map_err(|e| AppError::internal(e.to_string()))?;
    let preference_json = serde_json::to_value(&req.gender_preference)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let updated = diesel::update(profiles::table.find(profile.id))
        .set((
            profiles::display_name.eq(&req.display_name),
            profiles::birth_date.eq(birth_date),
            profiles::gender.eq(&req.gender),
            profiles::gender_preference.eq(&preference_json),
            profiles::bio.eq(&req.bio),
            profiles::interests.eq(&interests_json),
            profiles::onboarding_complete.eq(true),
            profiles::last_active_at.eq(Some(Utc::now())),
            profiles::updated_at.eq(Utc::now()),
        ))
        .get_result::<Profile>(&mut conn)?;

    publisher::publish_onboarding_completed(&state.rabbitmq, user.id, &req.display_name).await;

    tracing::info!(
        credential_id = %user.id,
        display_name = %req.display_name,
        "onboarding completed"
    );

    Ok(Json(ApiResponse::ok(updated.into())))
}

// --- GET /profiles/:id ---

pub async fn get_public_profile(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProfileView>>> {
    let mut conn = checkout(&state.db)?;

    let profile = profiles::table
        .filter(profiles::credential_id.eq(id))
        .first::<Profile>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile.into())))
}

// --- Helpers ---

fn validate_display_name(name: &str) -> AppResult<()> {
    if name.len() < 3 || name.len() > 20 {
        return Err(AppError::new(
            ErrorCode::InvalidDisplayName,
            "display name must be between 3 and 20 characters",
        ));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(AppError::new(
            ErrorCode::InvalidDisplayName,
            "display name can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn display_name_bounds() {
        assert!(validate_display_name("ab").is_err());
        assert!(validate_display_name("abc").is_ok());
        assert!(validate_display_name(&"a".repeat(21)).is_err());
    }

    #[test]
    fn display_name_charset() {
        assert!(validate_display_name("emma_26").is_ok());
        assert!(validate_display_name("emma 26").is_err());
        assert!(validate_display_name("emma!").is_err());
    }

    #[test]
    fn eighteenth_birthday_is_old_enough() {
        let today = Utc::now().date_naive();
        let birth = NaiveDate::from_ymd_opt(today.year() - 18, today.month(), today.day())
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year() - 18, today.month(), 28).unwrap());
        assert!(age_on(birth, today) >= MIN_AGE);
    }
}
