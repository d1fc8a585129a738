//! Web API Authentication Tests
//!
//! Integration tests for registration and login endpoints.

use axum_test::TestServer;
use datashare::config::Config;
use datashare::file::{FileStorage, UploadPolicy};
use datashare::web::handlers::AppState;
use datashare::web::middleware::JwtState;
use datashare::web::router::create_router;
use datashare::Database;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test configuration.
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.web.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.web.jwt_token_expiry_secs = 900;
    config
}

/// Create a test server with an in-memory database and temp storage.
async fn create_test_server() -> (TestServer, Arc<Database>, TempDir) {
    let config = create_test_config();

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let shared_db = Arc::new(db);

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = FileStorage::new(temp_dir.path()).expect("Failed to create storage");

    let app_state = Arc::new(AppState::new(
        shared_db.clone(),
        storage,
        UploadPolicy::new(&config.upload),
        &config.web.jwt_secret,
        config.web.jwt_token_expiry_secs,
    ));

    let jwt_state = Arc::new(JwtState::new(&config.web.jwt_secret));

    let router = create_router(app_state, jwt_state, &config.web.cors_origins);

    let server = TestServer::new(router).expect("Failed to create test server");

    (server, shared_db, temp_dir)
}

/// Helper to register a test user and return the response body.
async fn register_test_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

#[tokio::test]
async fn test_register_returns_access_token() {
    let (server, _db, _storage) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert!(body["data"]["access_token"].as_str().unwrap().len() > 0);
    assert_eq!(body["data"]["expires_in"], 900);
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let (server, _db, _storage) = create_test_server().await;

    register_test_user(&server, "dup@example.com", "password123").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "dup@example.com",
            "password": "otherpassword"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_email_rejected() {
    let (server, _db, _storage) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "not-an-email",
            "password": "password123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.json::<Value>();
    assert!(body["error"]["details"]["email"].is_array());
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let (server, _db, _storage) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "short@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_missing_fields_bad_request() {
    let (server, _db, _storage) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "incomplete@example.com"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_does_not_expose_internal_fields() {
    let (server, _db, _storage) = create_test_server().await;

    let body = register_test_user(&server, "private@example.com", "password123").await;

    let data = body["data"].as_object().unwrap();
    assert!(!data.contains_key("id"));
    assert!(!data.contains_key("password"));
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let (server, _db, _storage) = create_test_server().await;

    register_test_user(&server, "bob@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "bob@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert!(body["data"]["access_token"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let (server, _db, _storage) = create_test_server().await;

    register_test_user(&server, "carol@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "carol@example.com",
            "password": "wrongpassword"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_unauthorized() {
    let (server, _db, _storage) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_and_wrong_password_same_error() {
    let (server, _db, _storage) = create_test_server().await;

    register_test_user(&server, "dave@example.com", "password123").await;

    let unknown = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "ghost@example.com",
            "password": "password123"
        }))
        .await;

    let wrong = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "dave@example.com",
            "password": "badpassword"
        }))
        .await;

    // Responses must not reveal whether the account exists
    let unknown_body = unknown.json::<Value>();
    let wrong_body = wrong.json::<Value>();
    assert_eq!(unknown_body["error"]["message"], wrong_body["error"]["message"]);
}

#[tokio::test]
async fn test_login_case_insensitive_email() {
    let (server, _db, _storage) = create_test_server().await;

    register_test_user(&server, "eve@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "EVE@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_empty_credentials_bad_request() {
    let (server, _db, _storage) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "",
            "password": ""
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
