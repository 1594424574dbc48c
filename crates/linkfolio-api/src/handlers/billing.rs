//! PIX billing: the public price table, charge codes, and QR rendering.
//!
//! Payment confirmation is manual: these endpoints only produce a payload
//! the user can pay out-of-band. Plan activation is always an explicit
//! admin grant.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use linkfolio_core::{pix, AppError, PlanTier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PriceOffer {
    pub tier: PlanTier,
    /// Billing cycle label: "monthly" or "yearly"
    pub cycle: String,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricingResponse {
    pub currency: String,
    pub offers: Vec<PriceOffer>,
}

#[utoipa::path(
    get,
    path = "/api/v1/billing/pricing",
    tag = "billing",
    responses(
        (status = 200, description = "Configured upgrade offers", body = PricingResponse)
    )
)]
pub async fn get_pricing(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pricing = state.config.pricing();
    let offer = |tier, cycle: &str, amount| PriceOffer {
        tier,
        cycle: cycle.to_string(),
        amount,
    };
    Json(PricingResponse {
        currency: "BRL".to_string(),
        offers: vec![
            offer(PlanTier::Pro, "monthly", pricing.pro_monthly),
            offer(PlanTier::Pro, "yearly", pricing.pro_yearly),
            offer(PlanTier::Diamond, "monthly", pricing.diamond_monthly),
            offer(PlanTier::Diamond, "yearly", pricing.diamond_yearly),
        ],
    })
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PixChargeRequest {
    /// Amount in BRL; rounded to two decimals in the payload
    #[schema(value_type = f64)]
    pub amount: Decimal,
    /// Optional reconciliation id; generated when omitted
    #[validate(length(max = 25, message = "transaction_id cannot exceed 25 characters"))]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PixChargeResponse {
    /// The "copia e cola" payload
    pub code: String,
    pub transaction_id: String,
    /// Amount exactly as encoded in the payload, fixed two decimals
    pub amount: String,
}

fn build_charge(state: &AppState, payload: &PixChargeRequest) -> Result<PixChargeResponse, AppError> {
    let config = state
        .config
        .pix_config()
        .ok_or_else(|| AppError::BadRequest("PIX payments are not configured".to_string()))?;

    let transaction_id = pix::resolve_transaction_id(payload.transaction_id.as_deref());
    let amount = pix::normalize_amount(payload.amount)?;
    let code = pix::generate_pix_code(payload.amount, &config, Some(&transaction_id))?;

    Ok(PixChargeResponse {
        code,
        transaction_id,
        amount,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/billing/pix",
    tag = "billing",
    request_body = PixChargeRequest,
    responses(
        (status = 200, description = "Payable PIX code", body = PixChargeResponse),
        (status = 400, description = "PIX payments are not configured", body = ErrorResponse),
        (status = 422, description = "Non-positive amount", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn create_pix_charge(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<PixChargeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let charge = build_charge(&state, &payload)?;
    Ok(Json(charge))
}

#[utoipa::path(
    post,
    path = "/api/v1/billing/pix/qr",
    tag = "billing",
    request_body = PixChargeRequest,
    responses(
        (status = 200, description = "QR image for the PIX code", content_type = "image/svg+xml", body = String),
        (status = 400, description = "PIX payments are not configured", body = ErrorResponse),
        (status = 422, description = "Non-positive amount", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn create_pix_charge_qr(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<PixChargeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let charge = build_charge(&state, &payload)?;
    let svg = pix::generate_pix_qr_svg(&charge.code)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
