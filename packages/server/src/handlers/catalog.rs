use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::collection::CardRef;
use crate::collection::catalog::read_catalog;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// List the reference catalog.
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "Catalog",
    operation_id = "listCatalog",
    summary = "List all known cards",
    description = "Returns every catalog entry in reference-list order. \
        The list is re-read from the source on each request.",
    responses(
        (status = 200, description = "Catalog entries", body = Vec<CardRef>),
        (status = 503, description = "Catalog source unreadable (CATALOG_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_catalog(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let refs = read_catalog(Path::new(&state.config.catalog.path)).await?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(refs)))
}
