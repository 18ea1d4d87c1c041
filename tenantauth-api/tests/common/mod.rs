/// Common test utilities for integration tests
///
/// Builds the full router on top of the in-memory store, so these tests need
/// no database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tenantauth_api::app::{build_router, AppState};
use tenantauth_api::config::Config;
use tenantauth_shared::store::InMemoryCredentialStore;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<InMemoryCredentialStore>,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Router with the fixed tenant policy (tenant 1)
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Router with extra configuration variables
    pub fn with_vars(extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgresql://unused/test"),
            ("JWT_SECRET", JWT_SECRET),
            // Keep Argon2 cheap in tests
            ("PASSWORD_MEMORY_KIB", "1024"),
            ("PASSWORD_ITERATIONS", "1"),
            ("PASSWORD_PARALLELISM", "1"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }

        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let store = Arc::new(InMemoryCredentialStore::new());
        let app = build_router(AppState::new(store.clone(), config.clone()));

        TestContext { store, app, config }
    }

    /// Sends a JSON POST and returns status plus parsed body
    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Sends a GET and returns status plus parsed body
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Sends an arbitrary request and returns status plus parsed body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, json)
    }
}
