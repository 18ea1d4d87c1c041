//! # TenantAuth Shared Library
//!
//! This crate contains the credential-and-token lifecycle used by the
//! TenantAuth API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, token signing, tenant assignment and the
//!   credential/session services built on top of them
//! - `models`: Database models and data structures
//! - `store`: Credential store trait with PostgreSQL and in-memory backends
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the TenantAuth shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
