/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tenantauth_api::{app::AppState, config::Config};
/// use tenantauth_shared::store::InMemoryCredentialStore;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(InMemoryCredentialStore::new()), config);
/// let app = tenantauth_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tenantauth_shared::{
    auth::{
        credentials::CredentialService,
        session::SessionService,
        tenant_policy::{EmailDomainPolicy, FixedTenantPolicy, TenantAssignmentPolicy},
    },
    store::CredentialStore,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Login validation and signup
    pub credentials: Arc<CredentialService>,

    /// Token issuance
    pub sessions: Arc<SessionService>,

    /// Backing store, also used for health checks
    pub store: Arc<dyn CredentialStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services together from a store and configuration
    ///
    /// Signups go to `signup.default_tenant_id` unless `signup.tenant_domains`
    /// is non-empty, in which case the email domain picks the tenant and the
    /// default is the fallback.
    pub fn new(store: Arc<dyn CredentialStore>, config: Config) -> Self {
        let policy: Arc<dyn TenantAssignmentPolicy> = if config.signup.tenant_domains.is_empty() {
            Arc::new(FixedTenantPolicy::new(config.signup.default_tenant_id))
        } else {
            Arc::new(EmailDomainPolicy::new(
                config.signup.tenant_domains.clone(),
                Some(config.signup.default_tenant_id),
            ))
        };

        let credentials = CredentialService::new(store.clone(), policy, config.password);
        let sessions = SessionService::new(config.jwt.secret.clone(), config.token_lifetime());

        Self {
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
            store,
            config: Arc::new(config),
        }
    }
}

/// Fails unless every tenant the signup policy can pick exists
///
/// Covers `signup.default_tenant_id` and each `signup.tenant_domains` target,
/// so a bad mapping stops startup instead of failing signups later.
pub async fn ensure_signup_tenants(
    store: &dyn CredentialStore,
    config: &Config,
) -> anyhow::Result<()> {
    let mut ids: Vec<i64> = config.signup.tenant_domains.values().copied().collect();
    ids.push(config.signup.default_tenant_id);
    ids.sort_unstable();
    ids.dedup();

    for id in ids {
        if store.find_tenant(id).await?.is_none() {
            anyhow::bail!("Tenant {} referenced by signup configuration does not exist", id);
        }
    }

    Ok(())
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health          # Health check
/// ├── POST /auth/login      # Email + password -> token
/// └── POST /users/signup    # Create user
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    let user_routes = Router::new().route("/signup", post(routes::users::signup));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
