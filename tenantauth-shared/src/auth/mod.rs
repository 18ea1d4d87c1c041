/// Authentication utilities and services
///
/// This module provides the credential-and-token lifecycle for TenantAuth:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Token signing and validation
/// - [`tenant_policy`]: Decides which tenant a new user joins
/// - [`credentials`]: Login validation and signup orchestration
/// - [`session`]: Turns a validated user into a signed token
///
/// # Example
///
/// ```
/// use tenantauth_shared::auth::password::{hash_password, verify_password};
/// use tenantauth_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Token generation
/// let claims = Claims::new("user@example.com", 7, 1, None);
/// let token = create_token(&claims, "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.sub, 7);
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod session;
pub mod tenant_policy;
