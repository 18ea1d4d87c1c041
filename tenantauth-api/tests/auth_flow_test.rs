/// End-to-end tests for signup and login over the HTTP router
///
/// Run with: cargo test -p tenantauth-api --test auth_flow_test

mod common;

use axum::http::StatusCode;
use common::{TestContext, JWT_SECRET};
use serde_json::json;
use tenantauth_api::error::{DUPLICATE_EMAIL_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
use tenantauth_shared::auth::jwt::validate_token;
use tenantauth_shared::models::tenant::CreateTenant;
use tenantauth_shared::store::CredentialStore;

async fn signup(ctx: &TestContext, email: &str, password: &str, name: &str) -> (StatusCode, serde_json::Value) {
    ctx.post_json(
        "/users/signup",
        json!({ "email": email, "password": password, "userName": name }),
    )
    .await
}

async fn login(ctx: &TestContext, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    ctx.post_json("/auth/login", json!({ "email": email, "password": password }))
        .await
}

#[tokio::test]
async fn test_signup_login_round_trip() {
    let ctx = TestContext::new();

    let (status, user) = signup(&ctx, "a@x.com", "pw1", "A").await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", user);
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["userName"], "A");
    assert_eq!(user["tenantId"], 1);
    assert_eq!(user["role"], "member");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let (status, body) = login(&ctx, "a@x.com", "pw1").await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let token = body["access_token"].as_str().unwrap();
    let claims = validate_token(token, JWT_SECRET).unwrap();
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.sub, user["id"].as_i64().unwrap());
    assert_eq!(claims.tenant_id, 1);
    assert!(claims.exp.is_none());

    let (status, body) = login(&ctx, "a@x.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);

    let (status, body) = signup(&ctx, "a@x.com", "other", "B").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], DUPLICATE_EMAIL_MESSAGE);

    assert_eq!(ctx.store.user_count().await, 1);
}

#[tokio::test]
async fn test_unknown_email_matches_wrong_password() {
    let ctx = TestContext::new();
    signup(&ctx, "a@x.com", "pw1", "A").await;

    let (unknown_status, unknown_body) = login(&ctx, "nobody@x.com", "pw1").await;
    let (wrong_status, wrong_body) = login(&ctx, "a@x.com", "pw2").await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn test_login_with_empty_fields_is_unauthorized() {
    let ctx = TestContext::new();
    signup(&ctx, "a@x.com", "pw1", "A").await;

    for (email, password) in [("a@x.com", ""), ("", "pw1"), ("", "")] {
        let (status, body) = login(&ctx, email, password).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?}", (email, password));
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
    }
}

#[tokio::test]
async fn test_body_rejections_use_error_shape() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post_json("/auth/login", json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "body");

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/users/signup")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_signup_rejects_email_longer_than_column() {
    let ctx = TestContext::new();
    let email = format!("{}@{}.com", "a".repeat(64), vec!["b".repeat(60); 4].join("."));
    assert!(email.len() > 255);

    let (status, body) = signup(&ctx, &email, "pw1", "A").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "email");
    assert_eq!(ctx.store.user_count().await, 0);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let ctx = TestContext::new();
    signup(&ctx, "Mixed@X.com", "pw1", "A").await;

    let (status, _) = login(&ctx, "mixed@x.com", "pw1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_ignores_requested_tenant_and_role() {
    let ctx = TestContext::new();

    let (status, user) = ctx
        .post_json(
            "/users/signup",
            json!({
                "email": "c@x.com",
                "password": "pw1",
                "userName": "C",
                "tenantId": 42,
                "role": "admin"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["tenantId"], 1);
    assert_eq!(user["role"], "member");
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let ctx = TestContext::new();

    let (status, body) = signup(&ctx, "not-an-email", "pw1", "A").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");

    let (status, _) = signup(&ctx, "a@x.com", "pw1", "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Missing field is rejected by the JSON extractor
    let (status, _) = ctx
        .post_json("/users/signup", json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(ctx.store.user_count().await, 0);
}

#[tokio::test]
async fn test_domain_policy_routes_signup() {
    let ctx = TestContext::with_vars(&[("TENANT_DOMAINS", "acme.com=2")]);
    ctx.store
        .create_tenant(CreateTenant {
            company_name: "Acme".to_string(),
            plan_type: "pro".to_string(),
        })
        .await
        .unwrap();

    let (status, user) = signup(&ctx, "dev@acme.com", "pw1", "Dev").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["tenantId"], 2);

    let (status, user) = signup(&ctx, "guest@other.org", "pw1", "Guest").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["tenantId"], 1);

    let (_, body) = login(&ctx, "dev@acme.com", "pw1").await;
    let claims = validate_token(body["access_token"].as_str().unwrap(), JWT_SECRET).unwrap();
    assert_eq!(claims.tenant_id, 2);
}

#[tokio::test]
async fn test_token_expiry_configured() {
    let ctx = TestContext::with_vars(&[("JWT_EXPIRES_IN_SECONDS", "600")]);
    assert_eq!(ctx.config.jwt.expires_in_seconds, Some(600));

    signup(&ctx, "a@x.com", "pw1", "A").await;
    let (_, body) = login(&ctx, "a@x.com", "pw1").await;

    let claims = validate_token(body["access_token"].as_str().unwrap(), JWT_SECRET).unwrap();
    assert_eq!(claims.exp, Some(claims.iat + 600));
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
