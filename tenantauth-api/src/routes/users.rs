/// User endpoints
///
/// - `POST /users/signup` - Register a user in the tenant chosen by the
///   configured assignment policy

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tenantauth_shared::{auth::credentials::SignupInput, models::user::PublicUser};
use validator::Validate;

/// Signup request
///
/// Fields not listed here (for example `tenantId` or `role`) are ignored;
/// callers cannot pick their tenant or role.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Bounded by the `users.email` column width
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Display name
    #[serde(rename = "userName", alias = "name")]
    #[validate(length(min = 1, max = 50, message = "User name must be 1 to 50 characters"))]
    pub user_name: String,

    /// Forwarded to the tenant assignment policy
    #[serde(default, rename = "inviteCode")]
    pub invite_code: Option<String>,
}

/// Signup endpoint
///
/// ```text
/// POST /users/signup
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "password": "pw1",
///   "userName": "A"
/// }
/// ```
///
/// Responds `201 Created` with the user minus its password hash:
///
/// ```json
/// {
///   "id": 7,
///   "tenantId": 1,
///   "email": "a@x.com",
///   "userName": "A",
///   "role": "member",
///   "createdAt": "...",
///   "updatedAt": "..."
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Anything else
pub async fn signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    req.validate()?;

    let mut input = SignupInput::new(req.email, req.password, req.user_name);
    input.invite_code = req.invite_code;

    let user = state
        .credentials
        .signup(input)
        .await
        .map_err(ApiError::from_signup)?;

    Ok((StatusCode::CREATED, Json(user)))
}
