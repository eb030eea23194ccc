use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use noble_shared::clients::db::checkout;
use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::auth::TokenPair;
use noble_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{Credential, NewCredential, NewRefreshToken};
use crate::schema::{credentials, refresh_tokens};
use crate::services::{otp, token_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub phone_number: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub credential: Credential,
    pub tokens: TokenPair,
}

/// POST /verify-code - complete the phone verification flow and open a session
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyCodeRequest>,
) -> AppResult<Json<ApiResponse<VerifyCodeResponse>>> {
    let phone = req.phone_number.trim().to_string();
    otp::validate_phone_number(&phone)?;

    let stored = state
        .redis
        .get(&otp::code_key(&phone))
        .await
        .map_err(|e| AppError::store_unavailable(format!("failed to read code: {e}")))?
        .ok_or_else(|| {
            AppError::new(
                ErrorCode::VerificationCodeExpired,
                "verification session expired, request a new code",
            )
        })?;

    if stored != req.code.trim() {
        return Err(AppError::new(
            ErrorCode::VerificationCodeInvalid,
            "invalid verification code",
        ));
    }

    // Single-use: drop the code before issuing the session
    if let Err(e) = state.redis.del(&otp::code_key(&phone)).await {
        tracing::warn!(error = %e, "failed to delete used code");
    }

    let mut conn = checkout(&state.db)?;

    // Upsert the credential for this phone number
    let existing: Option<Credential> = credentials::table
        .filter(credentials::phone_number.eq(&phone))
        .first::<Credential>(&mut conn)
        .optional()?;

    let credential = match existing {
        Some(c) if c.phone_verified => c,
        Some(c) => diesel::update(credentials::table.find(c.id))
            .set((
                credentials::phone_verified.eq(true),
                credentials::updated_at.eq(chrono::Utc::now()),
            ))
            .get_result::<Credential>(&mut conn)?,
        None => {
            let created = diesel::insert_into(credentials::table)
                .values(&NewCredential {
                    phone_number: phone.clone(),
                    phone_verified: true,
                })
                .get_result::<Credential>(&mut conn)?;

            publisher::publish_user_verified(&state.rabbitmq, created.id, &phone).await;
            created
        }
    };

    let (tokens, refresh_hash) = token_service::create_token_pair(
        credential.id,
        &state.config.jwt_secret,
        state.config.jwt_access_ttl,
    )?;

    let new_rt = NewRefreshToken {
        credential_id: credential.id,
        token_hash: refresh_hash,
        expires_at: chrono::Utc::now() + chrono::Duration::seconds(state.config.jwt_refresh_ttl),
    };
    diesel::insert_into(refresh_tokens::table)
        .values(&new_rt)
        .execute(&mut conn)?;

    tracing::info!(credential_id = %credential.id, "phone verified, session opened");

    Ok(Json(ApiResponse::ok(VerifyCodeResponse { credential, tokens })))
}
