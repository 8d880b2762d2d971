/*
 * Responsibility
 * - AppError: the one place where failures become HTTP responses
 * - The gate's fixed 401/403 bodies live here next to the JSON error body used elsewhere
 * - Domain errors (AuthError / LoginError) convert via From
 */
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::login::LoginError;

/// Plain-text body when the gate finds no bearer credential.
pub const MISSING_TOKEN_MESSAGE: &str = "JWT 토큰이 필요합니다.";
/// JSON body when the gate rejects a presented token.
pub const INVALID_TOKEN_BODY: &str = r#"{"error": "Unauthorized"}"#;

pub const GUARD_UNAUTHENTICATED_MESSAGE: &str = "헤더에 정보가 없거나 유효하지 않습니다.";
pub const GUARD_FORBIDDEN_MESSAGE: &str = "해당 권한은 유효하지 않습니다";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    // request gate
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,

    // role guard
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,

    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::MissingToken => {
                return (StatusCode::UNAUTHORIZED, MISSING_TOKEN_MESSAGE).into_response();
            }
            AppError::InvalidToken => {
                return (
                    StatusCode::FORBIDDEN,
                    [(header::CONTENT_TYPE, "application/json")],
                    INVALID_TOKEN_BODY,
                )
                    .into_response();
            }
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                GUARD_UNAUTHENTICATED_MESSAGE.to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                GUARD_FORBIDDEN_MESSAGE.to_string(),
            ),
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", "not found".into()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated => AppError::Unauthenticated,
            AuthError::InsufficientRole => AppError::Forbidden,
        }
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::UserNotFound => {
                AppError::bad_request("USER_NOT_FOUND", "등록된 사용자가 없습니다.")
            }
            LoginError::PasswordMismatch => {
                AppError::bad_request("PASSWORD_MISMATCH", "비밀번호가 일치하지 않습니다.")
            }
            // Signing failures are already logged by the codec.
            LoginError::Token(_) => AppError::Internal,
        }
    }
}
