//! HTTP error mapping
//!
//! Bridges `linkfolio_core::AppError` into axum responses. Every handler
//! returns `Result<_, HttpAppError>`; the `IntoResponse` impl consults the
//! error's metadata for the status code, structured body, and log level.
//! Sensitive details are redacted in production responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkfolio_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

/// Structured error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Client-facing message
    pub error: String,
    /// Detailed diagnostics, omitted for sensitive errors in production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Error variant name, e.g. "NotFound"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Stable machine-readable code, e.g. "LINK_LIMIT_EXCEEDED"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Whether retrying the same request can succeed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<bool>,
    /// What the client should do about it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Newtype wrapper so `AppError` can implement `IntoResponse` without the
/// core crate depending on axum.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Invalid request body: {}",
            rejection
        )))
    }
}

impl From<validator::ValidationErrors> for HttpAppError {
    fn from(err: validator::ValidationErrors) -> Self {
        HttpAppError(AppError::from(err))
    }
}

pub(crate) fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

fn log_error(error: &AppError) {
    let details = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error_type = error.error_type(), "{}", details),
        LogLevel::Warn => tracing::warn!(error_type = error.error_type(), "{}", details),
        LogLevel::Error => tracing::error!(error_type = error.error_type(), "{}", details),
    }
}

fn build_error_response(error: &AppError, hide_details: bool) -> ErrorResponse {
    let details = if hide_details {
        None
    } else {
        Some(error.detailed_message())
    };
    ErrorResponse {
        error: error.client_message(),
        details,
        error_type: Some(error.error_type().to_string()),
        code: Some(error.error_code().to_string()),
        recoverable: Some(error.is_recoverable()),
        suggested_action: error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = self.0;
        log_error(&error);

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let hide_details = is_production_env() && error.is_sensitive();
        let body = build_error_response(&error, hide_details);

        (status, Json(body)).into_response()
    }
}

/// JSON extractor that maps body rejections into the structured error shape
/// and runs `validator` rules before the handler sees the payload.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        value.validate().map_err(HttpAppError::from)?;
        Ok(ValidatedJson(value))
    }
}
