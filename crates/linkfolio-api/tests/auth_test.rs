//! Auth API integration tests: register, login, and the bearer gate.
//!
//! Run with: `cargo test -p linkfolio-api --test auth_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{login, register_test_user, TEST_PASSWORD};
use helpers::{api_path, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_register_creates_free_account() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client).await;
    assert!(!user.token.is_empty());

    let response = client
        .get(&api_path("/me"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], user.username.as_str());
    assert_eq!(body["email"], user.email.as_str());
    assert_eq!(body["plan_type"], "free");
    assert_eq!(body["effective_plan"], "free");
    assert_eq!(body["is_admin"], false);
    assert_eq!(body["theme"], "default");
    assert_eq!(body["background"], "none");
    assert_eq!(body["layout"], "list");
}

#[tokio::test]
async fn test_register_normalizes_username_case() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/auth/register"))
        .json(&json!({
            "username": "  MixedCase_01 ",
            "email": "mixed@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["username"], "mixedcase_01");
}

#[tokio::test]
async fn test_register_rejects_duplicate_username() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client).await;

    let response = client
        .post(&api_path("/auth/register"))
        .json(&json!({
            "username": user.username,
            "email": "other@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 409);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client).await;

    let response = client
        .post(&api_path("/auth/register"))
        .json(&json!({
            "username": "someoneelse",
            "email": user.email,
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_register_rejects_invalid_usernames() {
    let app = setup_test_app().await;
    let client = app.client();

    for bad in ["ab", "has-hyphen", "has space", "admin", "api"] {
        let response = client
            .post(&api_path("/auth/register"))
            .json(&json!({
                "username": bad,
                "email": format!("{}@example.com", bad.replace(' ', "_").replace('-', "_")),
                "password": TEST_PASSWORD,
            }))
            .await;
        assert_eq!(response.status_code(), 400, "username {:?} was accepted", bad);
    }
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/auth/register"))
        .json(&json!({
            "username": "shortpw",
            "email": "shortpw@example.com",
            "password": "short",
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_login_returns_fresh_token() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client).await;
    let token = login(client, &user.email, &user.password).await;
    assert!(!token.is_empty());

    let response = client
        .get(&api_path("/me"))
        .add_header("Authorization", format!("Bearer {}", token))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_login_failure_shape_is_constant() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client).await;

    // Wrong password and unknown account must be indistinguishable.
    let wrong_password = client
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": user.email, "password": "not-the-password" }))
        .await;
    let unknown_account = client
        .post(&api_path("/auth/login"))
        .json(&json!({ "email": "nobody@example.com", "password": "not-the-password" }))
        .await;

    assert_eq!(wrong_password.status_code(), 401);
    assert_eq!(unknown_account.status_code(), 401);

    let a: serde_json::Value = wrong_password.json();
    let b: serde_json::Value = unknown_account.json();
    assert_eq!(a["error"], "Invalid email or password");
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = setup_test_app().await;
    let client = app.client();

    let missing = client.get(&api_path("/me")).await;
    assert_eq!(missing.status_code(), 401);

    let garbage = client
        .get(&api_path("/me"))
        .add_header("Authorization", "Bearer not-a-jwt")
        .await;
    assert_eq!(garbage.status_code(), 401);
}
