/// PostgreSQL credential store
///
/// Thin adapter from [`CredentialStore`] to the SQL in `models::user` and
/// `models::tenant`, translating constraint violations into [`StoreError`]s.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tenantauth_shared::db::pool::{create_pool, DatabaseConfig};
/// use tenantauth_shared::store::{CredentialStore, PgCredentialStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool));
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use super::{CredentialStore, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    tenant::{CreateTenant, Tenant},
    user::{NewUser, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// Credential store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

/// Maps insert failures, treating `users.email` uniqueness as `DuplicateEmail`
fn create_user_err(err: sqlx::Error, tenant_id: i64) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            debug!(constraint = ?db.constraint(), "Unique violation on user insert");
            return StoreError::DuplicateEmail;
        }
        if db.is_foreign_key_violation() {
            return StoreError::UnknownTenant(tenant_id);
        }
    }
    db_err(err)
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        User::find_by_email(&self.pool, email).await.map_err(db_err)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let tenant_id = user.tenant_id;
        User::create(&self.pool, user)
            .await
            .map_err(|e| create_user_err(e, tenant_id))
    }

    async fn find_tenant(&self, id: i64) -> StoreResult<Option<Tenant>> {
        Tenant::find_by_id(&self.pool, id).await.map_err(db_err)
    }

    async fn create_tenant(&self, tenant: CreateTenant) -> StoreResult<Tenant> {
        Tenant::create(&self.pool, tenant).await.map_err(db_err)
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_generic() {
        let err = create_user_err(sqlx::Error::RowNotFound, 1);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
