//! Bearer-token middleware for the protected route tree.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use linkfolio_core::AppError;

use crate::auth::jwt;
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;

/// State shared with the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

/// Validates the `Authorization: Bearer` token and attaches an
/// [`AuthContext`] to request extensions. Requests without a valid token
/// never reach the protected handlers.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match header_value.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) if !token.is_empty() => token,
        _ => {
            return HttpAppError(AppError::Unauthorized("Missing bearer token".to_string()))
                .into_response();
        }
    };

    let claims = match jwt::verify_token(token, &auth_state.jwt_secret) {
        Ok(claims) => claims,
        Err(err) => return HttpAppError(err).into_response(),
    };

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        is_admin: claims.admin,
    });

    next.run(request).await
}
