//! Link CRUD integration tests: creation cap, ordering, soft delete.
//!
//! Run with: `cargo test -p linkfolio-api --test links_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{register_test_user, TestUser};
use helpers::{api_path, setup_test_app};
use serde_json::json;

async fn create_link(
    client: &axum_test::TestServer,
    user: &TestUser,
    title: &str,
) -> serde_json::Value {
    let response = client
        .post(&api_path("/links"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "title": title,
            "url": format!("https://example.com/{}", title),
        }))
        .await;
    assert_eq!(
        response.status_code(),
        201,
        "create link failed: {}",
        response.text()
    );
    response.json()
}

async fn list_links(client: &axum_test::TestServer, user: &TestUser) -> Vec<serde_json::Value> {
    let response = client
        .get(&api_path("/links"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    body.as_array().expect("link list is an array").clone()
}

#[tokio::test]
async fn test_create_link_assigns_next_position() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    let first = create_link(client, &user, "first").await;
    assert_eq!(first["position"], 0);
    assert_eq!(first["is_visible"], true);

    let second = create_link(client, &user, "second").await;
    assert_eq!(second["position"], 1);

    let links = list_links(client, &user).await;
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["title"], "first");
    assert_eq!(links[1]["title"], "second");
}

#[tokio::test]
async fn test_free_plan_caps_active_links() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    for i in 0..3 {
        create_link(client, &user, &format!("link{}", i)).await;
    }

    let response = client
        .post(&api_path("/links"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "title": "one too many", "url": "https://example.com/4" }))
        .await;
    assert_eq!(response.status_code(), 422);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "LINK_LIMIT_EXCEEDED");

    // Deleting an active link frees a slot.
    let links = list_links(client, &user).await;
    let id = links[0]["id"].as_str().unwrap().to_string();
    let response = client
        .delete(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 204);

    create_link(client, &user, "fits_again").await;
}

#[tokio::test]
async fn test_pro_plan_lifts_link_cap() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    sqlx::query(
        "UPDATE users SET plan_type = 'pro', pro_expires_at = NOW() + INTERVAL '30 days' WHERE id = $1",
    )
    .bind(user.user_id)
    .execute(app.pool())
    .await
    .expect("Failed to grant pro");

    for i in 0..5 {
        create_link(client, &user, &format!("link{}", i)).await;
    }
    assert_eq!(list_links(client, &user).await.len(), 5);
}

#[tokio::test]
async fn test_lapsed_pro_restores_link_cap() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    sqlx::query(
        "UPDATE users SET plan_type = 'pro', pro_expires_at = NOW() - INTERVAL '1 day' WHERE id = $1",
    )
    .bind(user.user_id)
    .execute(app.pool())
    .await
    .expect("Failed to backdate grant");

    for i in 0..3 {
        create_link(client, &user, &format!("link{}", i)).await;
    }

    let response = client
        .post(&api_path("/links"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "title": "blocked", "url": "https://example.com/blocked" }))
        .await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn test_create_link_validates_input() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    for (title, url) in [
        ("   ", "https://example.com"),
        ("ok", "ftp://example.com"),
        ("ok", "example.com"),
        ("ok", "https://"),
    ] {
        let response = client
            .post(&api_path("/links"))
            .add_header("Authorization", format!("Bearer {}", user.token))
            .json(&json!({ "title": title, "url": url }))
            .await;
        assert_eq!(
            response.status_code(),
            400,
            "accepted title={:?} url={:?}",
            title,
            url
        );
    }
}

#[tokio::test]
async fn test_update_link_patches_fields_independently() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    let link = create_link(client, &user, "original").await;
    let id = link["id"].as_str().unwrap();

    let response = client
        .patch(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "title": "renamed" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["url"], "https://example.com/original");

    let response = client
        .patch(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "is_visible": false }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["is_visible"], false);
}

#[tokio::test]
async fn test_update_rejects_other_users_link() {
    let app = setup_test_app().await;
    let client = app.client();
    let owner = register_test_user(client).await;
    let intruder = register_test_user(client).await;

    let link = create_link(client, &owner, "mine").await;
    let id = link["id"].as_str().unwrap();

    let response = client
        .patch(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", intruder.token))
        .json(&json!({ "title": "stolen" }))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .delete(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", intruder.token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_is_idempotent_404_after_removal() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    let link = create_link(client, &user, "fleeting").await;
    let id = link["id"].as_str().unwrap();

    let response = client
        .delete(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 204);

    // The soft-deleted link is gone from the list and further writes miss.
    assert!(list_links(client, &user).await.is_empty());

    let response = client
        .delete(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = client
        .patch(&api_path(&format!("/links/{}", id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "title": "zombie" }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_reorder_applies_new_positions() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    let a = create_link(client, &user, "a").await;
    let b = create_link(client, &user, "b").await;
    let c = create_link(client, &user, "c").await;
    let ids = [
        c["id"].as_str().unwrap(),
        a["id"].as_str().unwrap(),
        b["id"].as_str().unwrap(),
    ];

    let response = client
        .put(&api_path("/links/reorder"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "link_ids": ids }))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["c", "a", "b"]);

    let links = list_links(client, &user).await;
    assert_eq!(links[0]["title"], "c");
    assert_eq!(links[0]["position"], 0);
}

#[tokio::test]
async fn test_reorder_rejects_partial_or_stale_sets() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client).await;

    let a = create_link(client, &user, "a").await;
    let b = create_link(client, &user, "b").await;
    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();

    // Missing one active link.
    let response = client
        .put(&api_path("/links/reorder"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "link_ids": [a_id] }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Contains an id that is not an active link of this user.
    let response = client
        .put(&api_path("/links/reorder"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "link_ids": [a_id, b_id, uuid::Uuid::new_v4()] }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Untouched order survives the failed attempts.
    let links = list_links(client, &user).await;
    assert_eq!(links[0]["title"], "a");
    assert_eq!(links[1]["title"], "b");
}
