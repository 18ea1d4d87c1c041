/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the right status code and a JSON body:
///
/// ```json
/// { "error": "unauthorized", "message": "이메일 또는 비밀번호가 올바르지 않습니다." }
/// ```
///
/// Internal failures keep their detail in the server log; the client only
/// sees a fixed message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tenantauth_shared::auth::{credentials::CredentialError, jwt::JwtError};

/// Login failure, identical for unknown email and wrong password
pub const INVALID_CREDENTIALS_MESSAGE: &str = "이메일 또는 비밀번호가 올바르지 않습니다.";

/// Signup with an email that is already registered
pub const DUPLICATE_EMAIL_MESSAGE: &str = "이미 사용 중인 이메일입니다.";

/// Signup failed for a server-side reason
pub const SIGNUP_FAILED_MESSAGE: &str = "사용자를 생성하는 데 실패했습니다.";

/// Any other server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - unparsable body or wrong content type
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    ///
    /// `message` goes to the client, `detail` only to the log.
    InternalError { message: String, detail: String },
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Internal error with the generic client message
    pub fn internal(detail: impl fmt::Display) -> Self {
        ApiError::InternalError {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Login rejected
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
    }

    /// Maps a signup failure: a taken email is 409, anything else a 500
    /// with the fixed signup message
    pub fn from_signup(err: CredentialError) -> Self {
        match err {
            CredentialError::DuplicateEmail => ApiError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()),
            other => ApiError::InternalError {
                message: SIGNUP_FAILED_MESSAGE.to_string(),
                detail: other.to_string(),
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError { detail, .. } => write!(f, "Internal error: {}", detail),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError { message, detail } => {
                // Log internal errors but don't expose details to clients
                tracing::error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    message,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert credential errors outside of signup
impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::DuplicateEmail => ApiError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()),
            other => ApiError::internal(other),
        }
    }
}

/// Token signing failures are server-side
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::internal(err)
    }
}

/// Body rejections: well-formed JSON with missing or mistyped fields is a
/// validation failure, anything else a bad request
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message: err.body_text(),
            }]),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Convert `validator` output into per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}
