//! Domain route groups (auth, public pages, links, profile, billing, admin).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::sync::Arc;

pub fn auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/auth/register", API_PREFIX),
            post(handlers::auth::register),
        )
        .route(
            &format!("{}/auth/login", API_PREFIX),
            post(handlers::auth::login),
        )
        .with_state(state)
}

pub fn catalog_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/catalogs", API_PREFIX),
            get(handlers::catalogs::list_catalogs),
        )
        .route(
            &format!("{}/billing/pricing", API_PREFIX),
            get(handlers::billing::get_pricing),
        )
        .with_state(state)
}

pub fn public_page_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/p/{{username}}", API_PREFIX),
            get(handlers::public_profile::get_public_profile),
        )
        .route(
            &format!("{}/p/links/{{id}}/click", API_PREFIX),
            post(handlers::public_profile::record_link_click),
        )
        .with_state(state)
}

pub fn me_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/me", API_PREFIX), get(handlers::me::get_me))
        .route(
            &format!("{}/me/profile", API_PREFIX),
            patch(handlers::me::update_profile),
        )
        .route(
            &format!("{}/me/appearance", API_PREFIX),
            patch(handlers::me::update_appearance),
        )
        .route(
            &format!("{}/me/plan", API_PREFIX),
            get(handlers::me::get_my_plan),
        )
        .route(
            &format!("{}/me/stats", API_PREFIX),
            get(handlers::me::get_my_stats),
        )
        .with_state(state)
}

pub fn link_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/links", API_PREFIX),
            get(handlers::links::list_links),
        )
        .route(
            &format!("{}/links", API_PREFIX),
            post(handlers::links::create_link),
        )
        .route(
            &format!("{}/links/reorder", API_PREFIX),
            put(handlers::links::reorder_links),
        )
        .route(
            &format!("{}/links/{{id}}", API_PREFIX),
            patch(handlers::links::update_link),
        )
        .route(
            &format!("{}/links/{{id}}", API_PREFIX),
            delete(handlers::links::delete_link),
        )
        .with_state(state)
}

pub fn billing_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/billing/pix", API_PREFIX),
            post(handlers::billing::create_pix_charge),
        )
        .route(
            &format!("{}/billing/pix/qr", API_PREFIX),
            post(handlers::billing::create_pix_charge_qr),
        )
        .with_state(state)
}

pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/admin/users", API_PREFIX),
            get(handlers::admin_users::list_users),
        )
        .route(
            &format!("{}/admin/users/{{id}}/plan", API_PREFIX),
            post(handlers::admin_users::grant_plan),
        )
        .route(
            &format!("{}/admin/users/{{id}}/plan", API_PREFIX),
            delete(handlers::admin_users::remove_plan),
        )
        .with_state(state)
}
