use std::path::Path;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::collection::catalog::read_catalog;
use crate::collection::reconcile::{missing, missing_with_foil_split, render_missing_txt};
use crate::collection::store;
use crate::error::{AppError, ErrorBody};
use crate::models::collection::{MissingEntryResponse, MissingQuery};
use crate::state::AppState;

/// Export the missing-cards list.
#[utoipa::path(
    get,
    path = "/missing",
    tag = "Missing",
    operation_id = "getMissing",
    summary = "List cards the collection still lacks",
    description = "Catalog entries whose joined status is not owned. With \
        `foil=true` the JSON list is split into never-owned and \
        foil-missing entries; `format=txt` renders the split as plain \
        text, one card per line.",
    params(MissingQuery),
    responses(
        (status = 200, description = "Missing entries (JSON array or text/plain)"),
        (status = 503, description = "Catalog or store unavailable (CATALOG_UNAVAILABLE, STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_missing(
    State(state): State<AppState>,
    Query(query): Query<MissingQuery>,
) -> Result<Response, AppError> {
    let refs = read_catalog(Path::new(&state.config.catalog.path)).await?;
    let statuses = store::load_all(&state.db).await?;

    let no_store = [(header::CACHE_CONTROL, "no-store")];

    if query.format.as_deref() == Some("txt") {
        let text = render_missing_txt(&missing_with_foil_split(&refs, &statuses));
        return Ok((
            no_store,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response());
    }

    if query.foil.unwrap_or(false) {
        let entries: Vec<MissingEntryResponse> = missing_with_foil_split(&refs, &statuses)
            .into_iter()
            .map(Into::into)
            .collect();
        return Ok((no_store, Json(entries)).into_response());
    }

    Ok((no_store, Json(missing(&refs, &statuses))).into_response())
}
