/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Exchange email and password for a bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Login request
///
/// Not validated beyond being present: an empty or malformed email is just
/// a login that fails with the usual 401.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed token carrying `{email, sub, tenantId}`
    pub access_token: String,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "pw1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email, wrong password or empty fields
///   (same message for all)
/// - `422 Unprocessable Entity`: Body lacks `email` or `password`
/// - `500 Internal Server Error`: Storage or signing failure
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .credentials
        .validate(&req.email, &req.password)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    let access_token = state.sessions.issue_token(&user)?;

    info!(user_id = user.id, tenant_id = user.tenant_id, "User logged in");

    Ok(Json(LoginResponse { access_token }))
}
