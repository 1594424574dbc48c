//! Request principal extracted from a verified token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::ErrorResponse;

/// Identity the auth middleware attaches to request extensions.
///
/// Handlers extract it as an argument; the admin flag reflects the token at
/// issuance time. Authorization decisions on entitlement mutations happen in
/// the entitlement service, not here.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Authentication required".to_string(),
                        details: None,
                        error_type: Some("Unauthorized".to_string()),
                        code: Some("UNAUTHORIZED".to_string()),
                        recoverable: Some(false),
                        suggested_action: Some("Provide a valid bearer token".to_string()),
                    }),
                )
            })
    }
}
