use std::collections::HashMap;
use std::path::Path;

use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::collection::catalog::{compare_refs, read_catalog};
use crate::collection::mutate::set_status;
use crate::collection::reconcile::list_with_status;
use crate::collection::{OwnershipStatus, store};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminSession;
use crate::extractors::json::AppJson;
use crate::models::collection::{CardRowResponse, StatusResponse, UpdateStatusRequest};
use crate::state::AppState;

/// List every catalog entry joined with its ownership status.
#[utoipa::path(
    get,
    path = "/collection",
    tag = "Collection",
    operation_id = "listCollection",
    summary = "List catalog entries with ownership status",
    description = "Left join of the catalog against the ownership store: \
        one row per catalog entry, all-false defaults for cards the store \
        has never seen, sorted by collector number.",
    responses(
        (status = 200, description = "Joined rows", body = Vec<CardRowResponse>),
        (status = 503, description = "Catalog or store unavailable (CATALOG_UNAVAILABLE, STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_collection(
    State(state): State<AppState>,
) -> Result<Json<Vec<CardRowResponse>>, AppError> {
    let refs = read_catalog(Path::new(&state.config.catalog.path)).await?;
    let statuses = store::load_all(&state.db).await?;

    let mut joined = list_with_status(&refs, &statuses);
    joined.sort_by(|a, b| compare_refs(&a.card, &b.card));

    Ok(Json(joined.into_iter().map(Into::into).collect()))
}

/// Ownership status keyed by the legacy `name|||number` wire form.
#[utoipa::path(
    get,
    path = "/collection/status",
    tag = "Collection",
    operation_id = "getStatusMap",
    summary = "Ownership status as a keyed mapping",
    description = "Raw store snapshot keyed by `\"name|||number\"` (empty \
        number for cards without one). Kept for grid clients that index by \
        key instead of iterating rows.",
    responses(
        (status = 200, description = "Status mapping", body = HashMap<String, OwnershipStatus>),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn status_map(
    State(state): State<AppState>,
) -> Result<Json<HashMap<String, OwnershipStatus>>, AppError> {
    let statuses = store::load_all(&state.db).await?;
    Ok(Json(
        statuses
            .into_iter()
            .map(|(key, status)| (key.wire(), status))
            .collect(),
    ))
}

/// Apply one ownership-status update.
#[utoipa::path(
    patch,
    path = "/collection",
    tag = "Collection",
    operation_id = "updateStatus",
    summary = "Update ownership flags for one card",
    description = "Merges the given flags over the current record \
        (defaults for a new key) and persists the result. Setting \
        `duplicate` forces `owned` regardless of the request. Requires an \
        admin session.",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Final merged record", body = StatusResponse),
        (status = 400, description = "Missing name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("admin_cookie" = [])),
)]
#[instrument(skip(state, _session, payload), fields(name = %payload.name))]
pub async fn update_status(
    _session: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let saved = set_status(
        &state.db,
        &payload.name,
        payload.number.as_deref(),
        payload.patch,
    )
    .await?;
    Ok(Json(saved.into()))
}
