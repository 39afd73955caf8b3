//! Catalog home page

use axum::{extract::State, Json};

use crate::{error::AppResult, services::summary::CatalogSummary, AppState};

/// Record counts shown on the catalog home page
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counts", body = CatalogSummary)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<CatalogSummary>> {
    Ok(Json(state.services.summary.counts().await?))
}
