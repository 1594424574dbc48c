//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::auth::middleware::AuthState;
use crate::constants::DEFAULT_CONCURRENCY_LIMIT;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use linkfolio_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = setup_auth_middleware(config)?;

    let public_routes = public_routes(state.clone());
    let protected_routes =
        protected_routes(state.clone()).layer(axum::middleware::from_fn_with_state(
            Arc::new(auth_state.clone()),
            crate::auth::middleware::auth_middleware,
        ));

    let app_state_routes = public_routes.merge(protected_routes);

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_CONCURRENCY_LIMIT)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = app_state_routes
        .merge(
            utoipa_rapidoc::RapiDoc::new(format!("{}/openapi.json", crate::constants::API_PREFIX))
                .path("/rapidoc"),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_size()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn setup_auth_middleware(config: &Config) -> Result<AuthState, anyhow::Error> {
    // Config::validate already enforces the minimum secret length; repeated
    // here so routers built from hand-rolled configs fail fast too.
    if config.jwt_secret().len() < 32 {
        return Err(anyhow::anyhow!(
            "JWT_SECRET must be at least 32 characters long"
        ));
    }

    Ok(AuthState {
        jwt_secret: config.jwt_secret().to_string(),
    })
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async { health::health_check(state).await }
                }
            }),
        )
        .route(
            "/health/live",
            get({
                let state = state.clone();
                move || async { health::liveness_check(state).await }
            }),
        )
        .route(
            "/health/ready",
            get({
                let state = state.clone();
                move || async { health::readiness_check(state).await }
            }),
        )
        .merge(domains::auth_routes(state.clone()))
        .merge(domains::catalog_routes(state.clone()))
        .merge(domains::public_page_routes(state.clone()))
        .with_state(state)
        .route(
            &format!("{}/openapi.json", crate::constants::API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(domains::me_routes(state.clone()))
        .merge(domains::link_routes(state.clone()))
        .merge(domains::billing_routes(state.clone()))
        .merge(domains::admin_routes(state.clone()))
        .with_state(state)
}
