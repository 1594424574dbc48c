//! OpenAPI documentation.
//!
//! All handler annotations carry their full `/api/v1` paths; the assembled
//! spec is served at `{API_PREFIX}/openapi.json` and rendered by RapiDoc.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use linkfolio_core::models;

/// Returns the assembled OpenAPI spec.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Linkfolio API",
        version = "0.1.0",
        description = "Link-in-bio backend with tiered subscriptions. Accounts, links, \
            public pages, analytics, PIX billing, and an admin plan-grant surface. All \
            endpoints are versioned under /api/v1/."
    ),
    modifiers(&SecurityAddon),
    paths(
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        // Profile & plan
        handlers::me::get_me,
        handlers::me::update_profile,
        handlers::me::update_appearance,
        handlers::me::get_my_plan,
        handlers::me::get_my_stats,
        // Links
        handlers::links::list_links,
        handlers::links::create_link,
        handlers::links::update_link,
        handlers::links::delete_link,
        handlers::links::reorder_links,
        // Public pages
        handlers::public_profile::get_public_profile,
        handlers::public_profile::record_link_click,
        // Catalogs
        handlers::catalogs::list_catalogs,
        // Billing
        handlers::billing::get_pricing,
        handlers::billing::create_pix_charge,
        handlers::billing::create_pix_charge_qr,
        // Admin
        handlers::admin_users::list_users,
        handlers::admin_users::grant_plan,
        handlers::admin_users::remove_plan,
    ),
    components(
        schemas(
            // Core models
            models::PlanTier,
            models::GrantDuration,
            models::Appearance,
            models::CatalogEntry,
            models::StatsTotals,
            models::DailyCount,
            models::LinkClickStats,
            // Auth
            handlers::auth::RegisterRequest,
            handlers::auth::LoginRequest,
            handlers::auth::AuthResponse,
            // Profile & plan
            handlers::me::UserResponse,
            handlers::me::UpdateProfileRequest,
            handlers::me::UpdateAppearanceRequest,
            handlers::me::PlanStatusResponse,
            handlers::me::StatsResponse,
            // Links
            handlers::links::LinkResponse,
            handlers::links::CreateLinkRequest,
            handlers::links::UpdateLinkRequest,
            handlers::links::ReorderRequest,
            // Public pages
            handlers::public_profile::PublicProfileResponse,
            handlers::public_profile::PublicLinkResponse,
            // Catalogs
            handlers::catalogs::CatalogResponse,
            // Billing
            handlers::billing::PriceOffer,
            handlers::billing::PricingResponse,
            handlers::billing::PixChargeRequest,
            handlers::billing::PixChargeResponse,
            // Admin
            handlers::admin_users::UserListResponse,
            handlers::admin_users::GrantPlanRequest,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "me", description = "Authenticated profile, appearance, plan, and stats"),
        (name = "links", description = "Link management for the authenticated user"),
        (name = "public", description = "Public page reads and click tracking"),
        (name = "catalogs", description = "Appearance catalogs (themes, backgrounds, layouts)"),
        (name = "billing", description = "Pricing and PIX payment codes"),
        (name = "admin", description = "Administrative plan grants")
    )
)]
pub struct ApiDoc;
