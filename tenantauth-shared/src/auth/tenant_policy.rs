/// Tenant assignment at signup
///
/// A new user has to land in exactly one tenant. Which one is a policy
/// decision, so the credential service asks a [`TenantAssignmentPolicy`]
/// instead of hardcoding an id.
///
/// # Policies
///
/// - [`FixedTenantPolicy`]: every signup joins one configured tenant
/// - [`EmailDomainPolicy`]: the email's domain selects the tenant
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use tenantauth_shared::auth::tenant_policy::{
///     EmailDomainPolicy, SignupContext, TenantAssignmentPolicy,
/// };
///
/// let policy = EmailDomainPolicy::new(HashMap::from([("acme.com".to_string(), 2)]), Some(1));
///
/// let ctx = SignupContext::new("jane@ACME.com");
/// assert_eq!(policy.assign(&ctx).unwrap(), 2);
///
/// let ctx = SignupContext::new("joe@elsewhere.org");
/// assert_eq!(policy.assign(&ctx).unwrap(), 1);
/// ```

use std::collections::HashMap;

/// Error type for tenant assignment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// No tenant could be resolved for this signup
    #[error("No tenant available for signup: {0}")]
    NoTenant(String),
}

/// What a policy may look at when choosing a tenant
#[derive(Debug, Clone, Default)]
pub struct SignupContext {
    /// Normalized email of the new user
    pub email: String,

    /// Invite code supplied with the signup, if any
    pub invite_code: Option<String>,
}

impl SignupContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            invite_code: None,
        }
    }

    /// Domain part of the email, lowercased
    pub fn email_domain(&self) -> Option<String> {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim().to_lowercase())
            .filter(|domain| !domain.is_empty())
    }
}

/// Chooses the tenant a new user is created in
pub trait TenantAssignmentPolicy: Send + Sync {
    fn assign(&self, ctx: &SignupContext) -> Result<i64, PolicyError>;
}

/// Assigns every signup to the same tenant
#[derive(Debug, Clone, Copy)]
pub struct FixedTenantPolicy {
    tenant_id: i64,
}

impl FixedTenantPolicy {
    pub fn new(tenant_id: i64) -> Self {
        Self { tenant_id }
    }
}

impl TenantAssignmentPolicy for FixedTenantPolicy {
    fn assign(&self, _ctx: &SignupContext) -> Result<i64, PolicyError> {
        Ok(self.tenant_id)
    }
}

/// Maps email domains to tenants
#[derive(Debug, Clone, Default)]
pub struct EmailDomainPolicy {
    domains: HashMap<String, i64>,
    fallback: Option<i64>,
}

impl EmailDomainPolicy {
    /// Domain keys are matched case-insensitively
    pub fn new(domains: HashMap<String, i64>, fallback: Option<i64>) -> Self {
        let domains = domains
            .into_iter()
            .map(|(domain, id)| (domain.trim().to_lowercase(), id))
            .collect();

        Self { domains, fallback }
    }
}

impl TenantAssignmentPolicy for EmailDomainPolicy {
    fn assign(&self, ctx: &SignupContext) -> Result<i64, PolicyError> {
        ctx.email_domain()
            .and_then(|domain| self.domains.get(&domain).copied())
            .or(self.fallback)
            .ok_or_else(|| {
                PolicyError::NoTenant(ctx.email_domain().unwrap_or_else(|| "<none>".to_string()))
            })
    }
}
