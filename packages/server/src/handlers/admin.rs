use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, Statement};
use tracing::instrument;

use crate::collection::catalog::read_catalog;
use crate::collection::reconcile::absent_from_store;
use crate::collection::store;
use crate::database::redact_url;
use crate::entity::collection;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AdminSession, SESSION_COOKIE};
use crate::extractors::json::AppJson;
use crate::models::admin::{
    LoginRequest, OkResponse, PingResponse, SyncResponse, VerifyCounts, VerifyResponse,
};
use crate::seed;
use crate::state::AppState;
use crate::utils::session;

/// Open an admin session.
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    operation_id = "adminLogin",
    summary = "Log in as admin",
    description = "Checks the admin password and sets the HttpOnly session \
        cookie on success.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = OkResponse),
        (status = 401, description = "Wrong password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !session::constant_time_eq(&payload.password, &state.config.auth.admin_password) {
        return Err(AppError::InvalidCredentials);
    }

    let max_age = state.config.auth.session_max_age_secs;
    let token = session::sign(&state.config.auth.session_secret, max_age)
        .map_err(|e| AppError::Internal(format!("Session sign error: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(max_age as i64))
        .build();

    Ok((jar.add(cookie), Json(OkResponse { ok: true })))
}

/// Close the admin session.
#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "Admin",
    operation_id = "adminLogout",
    summary = "Log out",
    responses(
        (status = 200, description = "Session cookie cleared", body = OkResponse),
    ),
)]
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), Json(OkResponse { ok: true }))
}

/// Probe the admin session and the store.
#[utoipa::path(
    get,
    path = "/admin/ping",
    tag = "Admin",
    operation_id = "adminPing",
    summary = "Check the session and store health",
    description = "Validates the session cookie and round-trips the store: \
        store-side clock, ownership row count, and the redacted connection \
        URL.",
    responses(
        (status = 200, description = "Session valid, store reachable", body = PingResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("admin_cookie" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn ping(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<PingResponse>, AppError> {
    let stmt = Statement::from_string(DbBackend::Postgres, "SELECT NOW()::text AS now");
    let row = state
        .db
        .query_one_raw(stmt)
        .await?
        .ok_or_else(|| AppError::Internal("clock probe returned no row".into()))?;
    let now: String = row.try_get("", "now")?;
    let rows = collection::Entity::find().count(&state.db).await?;

    Ok(Json(PingResponse {
        ok: true,
        now,
        rows,
        connection: redact_url(&state.config.database.url),
    }))
}

const REQUIRED_COLUMNS: [&str; 6] = ["name", "number", "owned", "duplicate", "foil", "updated_at"];

/// Report catalog-vs-store integrity.
#[utoipa::path(
    get,
    path = "/admin/verify",
    tag = "Admin",
    operation_id = "adminVerify",
    summary = "Check catalog coverage and schema shape",
    description = "Reports catalog entries with no store row (a sync gap) \
        and expected ownership-table columns absent from the live schema. \
        `ok` is true only when both lists are empty.",
    responses(
        (status = 200, description = "Integrity report", body = VerifyResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Catalog or store unavailable (CATALOG_UNAVAILABLE, STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("admin_cookie" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn verify(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<VerifyResponse>, AppError> {
    let refs = read_catalog(Path::new(&state.config.catalog.path)).await?;
    let statuses = store::load_all(&state.db).await?;
    let absent = absent_from_store(&refs, &statuses);

    let stmt = Statement::from_string(
        DbBackend::Postgres,
        "SELECT column_name FROM information_schema.columns \
         WHERE table_name = 'collection' AND table_schema = 'public'",
    );
    let column_rows = state.db.query_all_raw(stmt).await?;
    let present: std::collections::HashSet<String> = column_rows
        .iter()
        .map(|r| r.try_get("", "column_name"))
        .collect::<Result<_, _>>()?;
    let missing_columns: Vec<String> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|c| !present.contains(*c))
        .map(str::to_string)
        .collect();

    Ok(Json(VerifyResponse {
        ok: missing_columns.is_empty() && absent.is_empty(),
        counts: VerifyCounts {
            list: refs.len(),
            db: statuses.len(),
            missing: absent.len(),
        },
        missing_columns,
        missing_names: absent.into_iter().take(50).map(|r| r.name).collect(),
    }))
}

/// Sync the catalog into the ownership store.
#[utoipa::path(
    post,
    path = "/admin/sync",
    tag = "Admin",
    operation_id = "adminSync",
    summary = "Upsert every catalog row into the store",
    description = "Creates a store row for every catalog entry that lacks \
        one. Ownership flags on existing rows are never modified.",
    responses(
        (status = 200, description = "Sync outcome", body = SyncResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Catalog or store unavailable (CATALOG_UNAVAILABLE, STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("admin_cookie" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn sync(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, AppError> {
    let refs = read_catalog(Path::new(&state.config.catalog.path)).await?;
    let outcome = seed::sync_catalog(&state.db, &refs).await?;
    Ok(Json(outcome.into()))
}
