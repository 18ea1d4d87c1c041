/// In-memory credential store
///
/// Keeps tenants and users in maps behind a single async mutex, so the
/// email check and the insert in `create_user` happen atomically, the same
/// way the `users.email` unique constraint behaves in PostgreSQL.
///
/// A default tenant is seeded on construction so signups work out of the box.

use super::{CredentialStore, StoreError, StoreResult};
use crate::models::{
    tenant::{CreateTenant, Tenant},
    user::{NewUser, User},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    tenants: BTreeMap<i64, Tenant>,
    users: HashMap<String, User>,
    next_tenant_id: i64,
    next_user_id: i64,
}

/// Process-local credential store
pub struct InMemoryCredentialStore {
    state: Mutex<State>,
}

impl InMemoryCredentialStore {
    /// Creates a store seeded with tenant 1 ("Default", plan "free")
    pub fn new() -> Self {
        let mut state = State {
            next_tenant_id: 1,
            next_user_id: 1,
            ..Default::default()
        };
        insert_tenant(
            &mut state,
            CreateTenant {
                company_name: "Default".to_string(),
                plan_type: "free".to_string(),
            },
        );

        Self {
            state: Mutex::new(state),
        }
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_tenant(state: &mut State, data: CreateTenant) -> Tenant {
    let tenant = Tenant {
        id: state.next_tenant_id,
        company_name: data.company_name,
        plan_type: data.plan_type,
        created_at: Utc::now(),
    };
    state.next_tenant_id += 1;
    state.tenants.insert(tenant.id, tenant.clone());
    tenant
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.state.lock().await.users.get(email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;

        if state.users.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if !state.tenants.contains_key(&user.tenant_id) {
            return Err(StoreError::UnknownTenant(user.tenant_id));
        }

        let now = Utc::now();
        let created = User {
            id: state.next_user_id,
            tenant_id: user.tenant_id,
            email: user.email,
            password_hash: user.password_hash,
            user_name: user.user_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        state.next_user_id += 1;
        state.users.insert(created.email.clone(), created.clone());

        Ok(created)
    }

    async fn find_tenant(&self, id: i64) -> StoreResult<Option<Tenant>> {
        Ok(self.state.lock().await.tenants.get(&id).cloned())
    }

    async fn create_tenant(&self, tenant: CreateTenant) -> StoreResult<Tenant> {
        let mut state = self.state.lock().await;
        Ok(insert_tenant(&mut state, tenant))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
