//! Public appearance catalogs.

use axum::response::IntoResponse;
use axum::Json;
use linkfolio_core::models::appearance::{BACKGROUNDS, LAYOUTS, THEMES};
use linkfolio_core::models::CatalogEntry;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub themes: Vec<CatalogEntry>,
    pub backgrounds: Vec<CatalogEntry>,
    pub layouts: Vec<CatalogEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v1/catalogs",
    tag = "catalogs",
    responses(
        (status = 200, description = "Appearance catalogs with premium flags", body = CatalogResponse)
    )
)]
pub async fn list_catalogs() -> impl IntoResponse {
    Json(CatalogResponse {
        themes: THEMES.to_vec(),
        backgrounds: BACKGROUNDS.to_vec(),
        layouts: LAYOUTS.to_vec(),
    })
}
