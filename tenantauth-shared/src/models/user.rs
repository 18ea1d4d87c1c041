/// User model and database operations
///
/// A user is created once at signup and never updated or deleted through
/// the API. The stored `password_hash` stays inside this crate: [`User`] does
/// not implement `Serialize`, and callers only ever see [`PublicUser`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     tenant_id BIGINT NOT NULL REFERENCES tenants(id),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     user_name VARCHAR(50) NOT NULL,
///     role VARCHAR(20) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tenantauth_shared::models::user::{NewUser, User, UserRole};
/// use tenantauth_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, NewUser {
///     tenant_id: 1,
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     user_name: "Jane".to_string(),
///     role: UserRole::Member,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

/// Role of a user within its tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

impl UserRole {
    /// Converts role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a role string that is neither `admin` nor `member`
#[derive(Debug, thiserror::Error)]
#[error("Unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl TryFrom<String> for UserRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            _ => Err(UnknownRole(value)),
        }
    }
}

/// Stored user record, including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Owning tenant
    pub tenant_id: i64,

    /// Login email, unique across all tenants
    pub email: String,

    /// Argon2id PHC string, never the raw secret
    pub password_hash: String,

    /// Display name
    pub user_name: String,

    #[sqlx(try_from = "String")]
    pub role: UserRole,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to callers: everything except the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub tenant_id: i64,
    pub email: String,
    pub user_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Drops the password hash
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            tenant_id: self.tenant_id,
            email: self.email,
            user_name: self.user_name,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating a new user
///
/// `password_hash` must already be hashed; the store persists it verbatim.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: i64,
    pub email: String,
    pub password_hash: String,
    pub user_name: String,
    pub role: UserRole,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Tenant does not exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (tenant_id, email, password_hash, user_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, email, password_hash, user_name, role,
                      created_at, updated_at
            "#,
        )
        .bind(data.tenant_id)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.user_name)
        .bind(data.role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// The caller passes an already normalized (lowercased) email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, email, password_hash, user_name, role,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

/// Canonical form of an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
