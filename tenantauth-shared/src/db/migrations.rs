/// Database migration runner
///
/// Migrations live in `tenantauth-shared/migrations/` and are embedded into
/// the binary at compile time, so a deployed server needs no SQL files on disk.
///
/// # Migrations
///
/// - `0001_create_tenants`: `tenants` table plus the default tenant (id 1)
/// - `0002_create_users`: `users` table with the global `email` unique constraint

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply or the applied history
/// no longer matches the embedded files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
