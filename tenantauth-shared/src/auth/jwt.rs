/// Token signing and validation module
///
/// Session tokens are HS256-signed JWTs carrying the user's email, id and
/// tenant id. Clients treat them as opaque bearer tokens.
///
/// # Payload
///
/// ```json
/// { "email": "a@x.com", "sub": 42, "tenantId": 1, "iat": 1700000000 }
/// ```
///
/// `exp` is only added when an expiry is configured. Existing clients were
/// issued tokens without one, so it stays opt-in.
///
/// # Example
///
/// ```
/// use tenantauth_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("user@example.com", 42, 1, None);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, 42);
/// assert_eq!(validated.tenant_id, 1);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Login email of the user
    pub email: String,

    /// Subject - User ID
    pub sub: i64,

    /// Tenant the user belongs to
    #[serde(rename = "tenantId")]
    pub tenant_id: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp), absent when tokens do not expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Creates claims issued now
    ///
    /// `expires_in` of `None` produces a token without an `exp` claim.
    pub fn new(
        email: impl Into<String>,
        user_id: i64,
        tenant_id: i64,
        expires_in: Option<Duration>,
    ) -> Self {
        let now = Utc::now();

        Self {
            email: email.into(),
            sub: user_id,
            tenant_id,
            iat: now.timestamp(),
            exp: expires_in.map(|d| (now + d).timestamp()),
        }
    }

    /// Checks if the token has expired. Tokens without `exp` never expire.
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| Utc::now().timestamp() >= exp)
            .unwrap_or(false)
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
///
/// # Security
///
/// The secret should be at least 32 bytes, randomly generated and kept out
/// of source control.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature. `exp` is enforced when present and not
/// required otherwise.
///
/// # Errors
///
/// - `JwtError::Expired` if `exp` is in the past
/// - `JwtError::ValidationError` for a bad signature or malformed token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
