//! Public page integration tests: profile rendering, link visibility, clicks.
//!
//! Run with: `cargo test -p linkfolio-api --test public_page_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::auth::{register_test_user, TestUser};
use helpers::{api_path, setup_test_app, TestApp};
use serde_json::json;

async fn create_link(app: &TestApp, user: &TestUser, title: &str) -> serde_json::Value {
    let response = app
        .client()
        .post(&api_path("/links"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "title": title,
            "url": format!("https://example.com/{}", title),
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json()
}

async fn public_page(app: &TestApp, username: &str) -> axum_test::TestResponse {
    app.client()
        .get(&api_path(&format!("/p/{}", username)))
        .await
}

#[tokio::test]
async fn test_public_page_renders_profile_and_links() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    app.client()
        .patch(&api_path("/me/profile"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "display_name": "Alice Doe", "bio": "Things I made" }))
        .await
        .assert_status_ok();

    create_link(&app, &user, "blog").await;
    create_link(&app, &user, "shop").await;

    let response = public_page(&app, &user.username).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], user.username.as_str());
    assert_eq!(body["display_name"], "Alice Doe");
    assert_eq!(body["bio"], "Things I made");
    assert_eq!(body["show_badge"], false);
    assert_eq!(body["appearance"]["theme"], "default");
    assert_eq!(body["appearance"]["background"], "none");
    assert_eq!(body["appearance"]["layout"], "list");

    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["title"], "blog");
    // The public shape exposes no positions, visibility or timestamps.
    assert!(links[0].get("position").is_none());
    assert!(links[0].get("is_visible").is_none());
}

#[tokio::test]
async fn test_public_page_lookup_is_case_insensitive() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    let response = public_page(&app, &user.username.to_uppercase()).await;
    assert_eq!(response.status_code(), 200);

    let response = public_page(&app, "no_such_user").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_public_page_hides_invisible_links() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    create_link(&app, &user, "shown").await;
    let hidden = create_link(&app, &user, "hidden").await;

    app.client()
        .patch(&api_path(&format!("/links/{}", hidden["id"].as_str().unwrap())))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "is_visible": false }))
        .await
        .assert_status_ok();

    let response = public_page(&app, &user.username).await;
    let body: serde_json::Value = response.json();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["title"], "shown");
}

#[tokio::test]
async fn test_lapsed_page_caps_links_before_visibility() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    sqlx::query(
        "UPDATE users SET plan_type = 'pro', pro_expires_at = NOW() + INTERVAL '30 days' WHERE id = $1",
    )
    .bind(user.user_id)
    .execute(app.pool())
    .await
    .expect("Failed to grant pro");

    for i in 0..5 {
        create_link(&app, &user, &format!("link{}", i)).await;
    }

    // While entitled the page carries all five links.
    let response = public_page(&app, &user.username).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["links"].as_array().unwrap().len(), 5);

    sqlx::query("UPDATE users SET pro_expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(user.user_id)
        .execute(app.pool())
        .await
        .expect("Failed to backdate grant");

    // Lapsed: only the first three positions survive, extras stay stored.
    let response = public_page(&app, &user.username).await;
    let body: serde_json::Value = response.json();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(links[0]["title"], "link0");
    assert_eq!(links[2]["title"], "link2");
}

#[tokio::test]
async fn test_lapsed_page_downgrades_premium_appearance() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    sqlx::query(
        "UPDATE users SET plan_type = 'pro', pro_expires_at = NOW() + INTERVAL '30 days' WHERE id = $1",
    )
    .bind(user.user_id)
    .execute(app.pool())
    .await
    .expect("Failed to grant pro");

    app.client()
        .patch(&api_path("/me/appearance"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "theme": "midnight", "background": "waves", "layout": "grid" }))
        .await
        .assert_status_ok();

    sqlx::query("UPDATE users SET pro_expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(user.user_id)
        .execute(app.pool())
        .await
        .expect("Failed to backdate grant");

    // The stored selections stay, the public render falls back to defaults.
    let response = public_page(&app, &user.username).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["appearance"]["theme"], "default");
    assert_eq!(body["appearance"]["background"], "none");
    assert_eq!(body["appearance"]["layout"], "list");

    let me = app
        .client()
        .get(&api_path("/me"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    let body: serde_json::Value = me.json();
    assert_eq!(body["theme"], "midnight");
}

#[tokio::test]
async fn test_diamond_badge_on_public_page() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    sqlx::query("UPDATE users SET plan_type = 'diamond', pro_expires_at = NULL WHERE id = $1")
        .bind(user.user_id)
        .execute(app.pool())
        .await
        .expect("Failed to grant diamond");

    let response = public_page(&app, &user.username).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["show_badge"], true);
}

#[tokio::test]
async fn test_page_views_and_clicks_feed_stats() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    let link = create_link(&app, &user, "clicked").await;
    let link_id = link["id"].as_str().unwrap();

    public_page(&app, &user.username).await.assert_status_ok();
    public_page(&app, &user.username).await.assert_status_ok();

    let response = app
        .client()
        .post(&api_path(&format!("/p/links/{}/click", link_id)))
        .await;
    assert_eq!(response.status_code(), 204);

    let response = app
        .client()
        .get(&api_path("/me/stats"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["totals"]["total_views"], 2);
    assert_eq!(body["totals"]["total_clicks"], 1);
}

#[tokio::test]
async fn test_click_rejected_for_hidden_or_deleted_links() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client()).await;

    let hidden = create_link(&app, &user, "hidden").await;
    let hidden_id = hidden["id"].as_str().unwrap().to_string();
    app.client()
        .patch(&api_path(&format!("/links/{}", hidden_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "is_visible": false }))
        .await
        .assert_status_ok();

    let deleted = create_link(&app, &user, "deleted").await;
    let deleted_id = deleted["id"].as_str().unwrap().to_string();
    app.client()
        .delete(&api_path(&format!("/links/{}", deleted_id)))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;

    for id in [hidden_id.as_str(), deleted_id.as_str()] {
        let response = app
            .client()
            .post(&api_path(&format!("/p/links/{}/click", id)))
            .await;
        assert_eq!(response.status_code(), 404, "click on {} was recorded", id);
    }

    let response = app
        .client()
        .post(&api_path(&format!("/p/links/{}/click", uuid::Uuid::new_v4())))
        .await;
    assert_eq!(response.status_code(), 404);
}
