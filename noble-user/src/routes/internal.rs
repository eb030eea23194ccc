use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use noble_shared::types::profile::ProfileSummary;

use crate::models::Profile;
use crate::schema::profiles;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchProfilesRequest {
    pub credential_ids: Vec<Uuid>,
}

/// POST /internal/profiles/batch - resolve profile summaries for a set of
/// credential ids (service-to-service, no auth). Unknown ids are skipped.
pub async fn batch_profiles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchProfilesRequest>,
) -> Json<Vec<ProfileSummary>> {
    if req.credential_ids.is_empty() {
        return Json(vec![]);
    }

    let mut conn = match state.db.get() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to get db connection for batch profiles");
            return Json(vec![]);
        }
    };

    let found: Vec<Profile> = profiles::table
        .filter(profiles::credential_id.eq_any(&req.credential_ids))
        .load::<Profile>(&mut conn)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load profiles batch");
            vec![]
        });

    Json(found.iter().map(Profile::summary).collect())
}
