/// Database models for TenantAuth
///
/// # Models
///
/// - `tenant`: Customer organizations. Immutable once created.
/// - `user`: Login accounts, each belonging to exactly one tenant
///
/// Both modules carry the SQL for their table; the PostgreSQL credential
/// store delegates to them.

pub mod tenant;
pub mod user;
