/// Credential store
///
/// Persistence behind the credential service. The service never talks to
/// a database directly; it goes through [`CredentialStore`], which has two
/// implementations:
///
/// - [`postgres::PgCredentialStore`]: production backend over `sqlx`
/// - [`memory::InMemoryCredentialStore`]: process-local backend for tests
///   and local runs
///
/// # Uniqueness
///
/// Both backends reject a second user with the same email atomically and
/// report it as [`StoreError::DuplicateEmail`]. This is the only guarantee
/// of email uniqueness; any lookup done before `create_user` is a fast path.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

use crate::models::{
    tenant::{CreateTenant, Tenant},
    user::{NewUser, User},
};
use async_trait::async_trait;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this email already exists
    #[error("Email already registered")]
    DuplicateEmail,

    /// The referenced tenant does not exist
    #[error("Tenant {0} does not exist")]
    UnknownTenant(i64),

    /// Any other backend failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations needed by the credential lifecycle
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up a user by normalized email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user whose password is already hashed
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_tenant(&self, id: i64) -> StoreResult<Option<Tenant>>;

    async fn create_tenant(&self, tenant: CreateTenant) -> StoreResult<Tenant>;

    /// Checks the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
