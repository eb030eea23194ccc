use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth errors
/// - E2xxx: Profile errors
/// - E3xxx: Swipe/match errors
/// - E4xxx: Messaging errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServiceUnavailable,
    BadRequest,
    PayloadTooLarge,

    // Auth (E1xxx)
    InvalidPhoneNumber,
    PhoneRateLimited,
    VerificationCodeExpired,
    VerificationCodeInvalid,
    TokenExpired,
    TokenInvalid,
    RefreshTokenRevoked,

    // Profile (E2xxx)
    ProfileNotFound,
    InvalidDisplayName,
    DisplayNameTaken,
    UnderageBirthDate,
    PhotoUploadFailed,
    PhotoNotFound,
    OnboardingIncomplete,

    // Swipe/match (E3xxx)
    CannotSwipeSelf,
    InvalidSwipeDirection,
    MatchNotFound,
    AlreadyMatched,
    LikeNotFound,

    // Messaging (E4xxx)
    ConversationNotFound,
    NotConversationMember,
    MessageNotFound,
    EmptyMessage,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::RateLimited => "E0006",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",
            Self::PayloadTooLarge => "E0009",

            // Auth
            Self::InvalidPhoneNumber => "E1001",
            Self::PhoneRateLimited => "E1002",
            Self::VerificationCodeExpired => "E1003",
            Self::VerificationCodeInvalid => "E1004",
            Self::TokenExpired => "E1005",
            Self::TokenInvalid => "E1006",
            Self::RefreshTokenRevoked => "E1007",

            // Profile
            Self::ProfileNotFound => "E2001",
            Self::InvalidDisplayName => "E2002",
            Self::DisplayNameTaken => "E2003",
            Self::UnderageBirthDate => "E2004",
            Self::PhotoUploadFailed => "E2005",
            Self::PhotoNotFound => "E2006",
            Self::OnboardingIncomplete => "E2007",

            // Swipe/match
            Self::CannotSwipeSelf => "E3001",
            Self::InvalidSwipeDirection => "E3002",
            Self::MatchNotFound => "E3003",
            Self::AlreadyMatched => "E3004",
            Self::LikeNotFound => "E3005",

            // Messaging
            Self::ConversationNotFound => "E4001",
            Self::NotConversationMember => "E4002",
            Self::MessageNotFound => "E4003",
            Self::EmptyMessage => "E4004",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidPhoneNumber
            | Self::InvalidDisplayName | Self::UnderageBirthDate | Self::InvalidSwipeDirection
            | Self::EmptyMessage | Self::PhotoUploadFailed => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound | Self::ProfileNotFound | Self::PhotoNotFound | Self::MatchNotFound
            | Self::LikeNotFound | Self::ConversationNotFound | Self::MessageNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid
            | Self::RefreshTokenRevoked | Self::VerificationCodeExpired
            | Self::VerificationCodeInvalid => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::OnboardingIncomplete | Self::CannotSwipeSelf
            | Self::NotConversationMember => StatusCode::FORBIDDEN,
            Self::RateLimited | Self::PhoneRateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::DisplayNameTaken | Self::AlreadyMatched => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Transient store failure (pool exhausted, backend unreachable).
    /// Safe for clients to retry with backoff.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            ErrorCode::InternalError,
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::RateLimited,
            ErrorCode::ServiceUnavailable,
            ErrorCode::BadRequest,
            ErrorCode::PayloadTooLarge,
            ErrorCode::InvalidPhoneNumber,
            ErrorCode::PhoneRateLimited,
            ErrorCode::VerificationCodeExpired,
            ErrorCode::VerificationCodeInvalid,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::RefreshTokenRevoked,
            ErrorCode::ProfileNotFound,
            ErrorCode::InvalidDisplayName,
            ErrorCode::DisplayNameTaken,
            ErrorCode::UnderageBirthDate,
            ErrorCode::PhotoUploadFailed,
            ErrorCode::PhotoNotFound,
            ErrorCode::OnboardingIncomplete,
            ErrorCode::CannotSwipeSelf,
            ErrorCode::InvalidSwipeDirection,
            ErrorCode::MatchNotFound,
            ErrorCode::AlreadyMatched,
            ErrorCode::LikeNotFound,
            ErrorCode::ConversationNotFound,
            ErrorCode::NotConversationMember,
            ErrorCode::MessageNotFound,
            ErrorCode::EmptyMessage,
        ];
        let mut seen = std::collections::HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn duplicate_match_maps_to_conflict() {
        assert_eq!(ErrorCode::AlreadyMatched.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn expired_verification_maps_to_unauthorized() {
        assert_eq!(
            ErrorCode::VerificationCodeExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
