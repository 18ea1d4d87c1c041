/// Tenant model and database operations
///
/// A tenant is a customer organization. Users reference their tenant by id;
/// the tenant keeps no list of its users.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenants (
///     id BIGSERIAL PRIMARY KEY,
///     company_name VARCHAR(100) NOT NULL,
///     plan_type VARCHAR(50) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Tenant model representing a customer organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i64,

    /// Company name
    pub company_name: String,

    /// Billing plan identifier (free-form, e.g. "free", "pro")
    pub plan_type: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub company_name: String,
    pub plan_type: String,
}

impl Tenant {
    /// Creates a new tenant in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(pool: &PgPool, data: CreateTenant) -> Result<Self, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (company_name, plan_type)
            VALUES ($1, $2)
            RETURNING id, company_name, plan_type, created_at
            "#,
        )
        .bind(data.company_name)
        .bind(data.plan_type)
        .fetch_one(pool)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, company_name, plan_type, created_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_serializes_camel_case() {
        let tenant = Tenant {
            id: 1,
            company_name: "Acme".to_string(),
            plan_type: "free".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&tenant).unwrap();
        assert_eq!(json["companyName"], "Acme");
        assert_eq!(json["planType"], "free");
        assert!(json.get("createdAt").is_some());
    }
}
