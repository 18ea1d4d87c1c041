/// Credential service
///
/// Validates email/password pairs at login and orchestrates signup.
///
/// # Login
///
/// `validate` returns `Ok(None)` for both an unknown email and a wrong
/// password. Both paths run exactly one Argon2 verification (an unknown email
/// is checked against a throwaway hash), so response time does not reveal
/// which one happened.
///
/// # Signup
///
/// 1. Normalize the email and reject it early if already registered
/// 2. Ask the [`TenantAssignmentPolicy`] for the tenant
/// 3. Hash the password
/// 4. Insert with role `member`; a unique violation here is also `DuplicateEmail`
///
/// Step 1 is only a fast path: two concurrent signups can both pass it, and
/// the store's unique constraint decides the winner in step 4.
///
/// Hashing and verification run on the blocking thread pool so that Argon2's
/// CPU cost does not stall other requests on the runtime.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tenantauth_shared::auth::credentials::{CredentialService, SignupInput};
/// use tenantauth_shared::auth::password::HashParams;
/// use tenantauth_shared::auth::tenant_policy::FixedTenantPolicy;
/// use tenantauth_shared::store::InMemoryCredentialStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = CredentialService::new(
///     Arc::new(InMemoryCredentialStore::new()),
///     Arc::new(FixedTenantPolicy::new(1)),
///     HashParams::default(),
/// );
///
/// service.signup(SignupInput::new("a@x.com", "pw1", "A")).await?;
/// assert!(service.validate("a@x.com", "pw1").await?.is_some());
/// assert!(service.validate("a@x.com", "wrong").await?.is_none());
/// # Ok(())
/// # }
/// ```

use super::password::{hash_password_with, verify_password, HashParams, PasswordError};
use super::tenant_policy::{PolicyError, SignupContext, TenantAssignmentPolicy};
use crate::models::user::{normalize_email, NewUser, PublicUser, UserRole};
use crate::store::{CredentialStore, StoreError};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Secret used to build the throwaway hash for unknown-email logins
const DUMMY_SECRET: &str = "tenantauth-unknown-user";

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Signup with an email that is already registered
    #[error("Email already registered")]
    DuplicateEmail,

    /// No tenant could be chosen for the new user
    #[error(transparent)]
    TenantAssignment(#[from] PolicyError),

    /// Persistence failure
    #[error(transparent)]
    Storage(StoreError),

    /// Hashing or verification failure
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => CredentialError::DuplicateEmail,
            other => CredentialError::Storage(other),
        }
    }
}

/// Signup candidate
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,

    /// Raw password; hashed before it reaches the store
    pub password: String,

    pub user_name: String,

    /// Passed through to the tenant policy
    pub invite_code: Option<String>,
}

impl SignupInput {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_name: user_name.into(),
            invite_code: None,
        }
    }
}

/// Validates credentials and creates users
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    policy: Arc<dyn TenantAssignmentPolicy>,
    hash_params: HashParams,
    dummy_hash: OnceCell<String>,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        policy: Arc<dyn TenantAssignmentPolicy>,
        hash_params: HashParams,
    ) -> Self {
        Self {
            store,
            policy,
            hash_params,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Checks an email/password pair
    ///
    /// Returns the user without its password hash on a match, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Only for store failures or a corrupt stored hash; a mismatch is never an error.
    pub async fn validate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<PublicUser>, CredentialError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            let dummy = self.dummy_hash().await?;
            let _ = verify_blocking(password.to_owned(), dummy).await;
            debug!("Login rejected: unknown email");
            return Ok(None);
        };

        if verify_blocking(password.to_owned(), user.password_hash.clone()).await? {
            debug!(user_id = user.id, tenant_id = user.tenant_id, "Credentials validated");
            Ok(Some(user.into_public()))
        } else {
            debug!(user_id = user.id, "Login rejected: password mismatch");
            Ok(None)
        }
    }

    /// Creates a new member account
    ///
    /// # Errors
    ///
    /// - `DuplicateEmail` if the email is taken, whether seen by the early
    ///   lookup or by the store's unique constraint
    /// - `TenantAssignment` if the policy cannot place the user
    /// - `Storage` / `Password` for backend or hashing failures
    pub async fn signup(&self, input: SignupInput) -> Result<PublicUser, CredentialError> {
        let email = normalize_email(&input.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!("Signup rejected: email already registered");
            return Err(CredentialError::DuplicateEmail);
        }

        let ctx = SignupContext {
            email: email.clone(),
            invite_code: input.invite_code,
        };
        let tenant_id = self.policy.assign(&ctx)?;

        let password_hash = hash_blocking(input.password, self.hash_params).await?;

        let user = self
            .store
            .create_user(NewUser {
                tenant_id,
                email,
                password_hash,
                user_name: input.user_name,
                role: UserRole::Member,
            })
            .await?;

        info!(user_id = user.id, tenant_id = user.tenant_id, "User signed up");
        Ok(user.into_public())
    }

    async fn dummy_hash(&self) -> Result<String, PasswordError> {
        self.dummy_hash
            .get_or_try_init(|| hash_blocking(DUMMY_SECRET.to_string(), self.hash_params))
            .await
            .cloned()
    }
}

async fn hash_blocking(password: String, params: HashParams) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password_with(&password, &params))
        .await
        .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
}
