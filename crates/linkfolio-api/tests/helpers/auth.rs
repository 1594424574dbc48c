//! Auth helpers: register accounts and mint admin sessions.

use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

/// Password shared by every test account.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A registered account with its bearer token.
pub struct TestUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Register a fresh account under a unique username; returns the token and
/// user id parsed from the register response.
pub async fn register_test_user(client: &TestServer) -> TestUser {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("user{}", &suffix[..12]);
    let email = format!("{}@example.com", username);

    let response = client
        .post(&super::api_path("/auth/register"))
        .json(&json!({
            "username": username,
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(
        response.status_code(),
        201,
        "register failed: {}",
        response.text()
    );

    let body: serde_json::Value = response.json();
    let token = body["token"]
        .as_str()
        .expect("token in register response")
        .to_string();
    let user_id = body["user"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("user id in register response");

    TestUser {
        user_id,
        username,
        email,
        password: TEST_PASSWORD.to_string(),
        token,
    }
}

/// Log in with an existing account; returns a fresh token.
#[allow(dead_code)]
pub async fn login(client: &TestServer, email: &str, password: &str) -> String {
    let response = client
        .post(&super::api_path("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(
        response.status_code(),
        200,
        "login failed: {}",
        response.text()
    );
    let body: serde_json::Value = response.json();
    body["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Flip the admin flag in the database, then re-login so the token carries
/// the admin claim (claims are captured at issuance).
#[allow(dead_code)]
pub async fn promote_to_admin(pool: &sqlx::PgPool, client: &TestServer, user: &mut TestUser) {
    sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
        .bind(user.user_id)
        .execute(pool)
        .await
        .expect("Failed to promote user to admin");
    user.token = login(client, &user.email, &user.password).await;
}
