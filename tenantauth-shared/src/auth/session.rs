/// Session service
///
/// Turns a validated user into a signed bearer token. Stateless: nothing is
/// recorded about issued tokens.

use super::jwt::{create_token, Claims, JwtError};
use crate::models::user::PublicUser;
use chrono::Duration;
use tracing::debug;

/// Issues session tokens
#[derive(Clone)]
pub struct SessionService {
    secret: String,
    expires_in: Option<Duration>,
}

impl SessionService {
    /// `expires_in` of `None` issues tokens without an `exp` claim
    pub fn new(secret: impl Into<String>, expires_in: Option<Duration>) -> Self {
        Self {
            secret: secret.into(),
            expires_in,
        }
    }

    /// Signs `{email, sub, tenantId, iat[, exp]}` for the user
    pub fn issue_token(&self, user: &PublicUser) -> Result<String, JwtError> {
        let claims = Claims::new(user.email.clone(), user.id, user.tenant_id, self.expires_in);
        let token = create_token(&claims, &self.secret)?;

        debug!(user_id = user.id, tenant_id = user.tenant_id, "Issued session token");
        Ok(token)
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
