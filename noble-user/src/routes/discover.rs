use axum::extract::{Query, State};
use axum::Json;
use diesel::dsl::count_star;
use diesel::prelude::*;
use std::sync::Arc;

use noble_shared::clients::db::checkout;
use noble_shared::errors::AppResult;
use noble_shared::types::auth::AuthUser;
use noble_shared::types::pagination::{Paginated, PaginationParams};
use noble_shared::types::ApiResponse;

use crate::models::{Profile, ProfileView};
use crate::schema::profiles;
use crate::AppState;

/// GET /discover?page=1&limit=20 - paginated swipe candidates
///
/// Returns every completed profile except the caller's own, most recently
/// active first. The caller's stated preferences (age range, gender,
/// distance) and swipe history are NOT applied here; the swipe deck shows
/// the unfiltered directory.
pub async fn list_candidates(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<ProfileView>>>> {
    let mut conn = checkout(&state.db)?;

    let total: i64 = profiles::table
        .filter(profiles::credential_id.ne(user.id))
        .filter(profiles::onboarding_complete.eq(true))
        .select(count_star())
        .first::<i64>(&mut conn)?;

    let candidates: Vec<Profile> = profiles::table
        .filter(profiles::credential_id.ne(user.id))
        .filter(profiles::onboarding_complete.eq(true))
        .order(profiles::last_active_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Profile>(&mut conn)?;

    let items: Vec<ProfileView> = candidates.into_iter().map(ProfileView::from).collect();

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}
