use diesel::prelude::*;
use uuid::Uuid;

use noble_shared::clients::db::{checkout, DbPool};
use noble_shared::errors::AppResult;

use crate::models::{NewProfile, Profile};
use crate::schema::profiles;

/// Creates an empty profile for a freshly verified credential.
/// Called from the RabbitMQ subscriber when a `user.verified` event arrives.
pub fn create_default_profile(pool: &DbPool, credential_id: Uuid) -> AppResult<Profile> {
    let mut conn = checkout(pool)?;

    let new_profile = NewProfile { credential_id };

    let profile = diesel::insert_into(profiles::table)
        .values(&new_profile)
        .get_result::<Profile>(&mut conn)?;

    tracing::info!(
        profile_id = %profile.id,
        credential_id = %credential_id,
        "default profile created"
    );

    Ok(profile)
}
