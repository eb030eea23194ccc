use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use noble_shared::errors::{AppError, AppResult, ErrorCode};
use noble_shared::types::ApiResponse;

use crate::services::otp;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestCodeRequest {
    pub phone_number: String,
}

#[derive(Debug, Serialize)]
pub struct RequestCodeResponse {
    pub expires_in: u64,
}

/// POST /request-code - start the phone verification flow
pub async fn request_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RequestCodeRequest>,
) -> AppResult<Json<ApiResponse<RequestCodeResponse>>> {
    let phone = req.phone_number.trim().to_string();
    otp::validate_phone_number(&phone)?;

    // One code request per phone per minute
    let allowed = state
        .redis
        .rate_limit_check(&otp::rate_key(&phone), 1, 60)
        .await
        .unwrap_or(true);

    if !allowed {
        return Err(AppError::new(
            ErrorCode::PhoneRateLimited,
            "please wait before requesting a new code",
        ));
    }

    let code = otp::generate_code();
    state
        .redis
        .set(&otp::code_key(&phone), &code, otp::CODE_TTL_SECS)
        .await
        .map_err(|e| AppError::store_unavailable(format!("failed to store code: {e}")))?;

    if let Err(e) = state.sms.send_verification_code(&phone, &code).await {
        tracing::error!(error = %e, "failed to send verification sms");
    }

    tracing::info!(phone = %phone, "verification code issued");

    Ok(Json(ApiResponse::ok(RequestCodeResponse {
        expires_in: otp::CODE_TTL_SECS,
    })))
}
