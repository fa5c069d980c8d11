use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::models::prices::{PricesQuery, PricesResponse};
use crate::state::AppState;

/// Scraped market prices, TTL-cached.
#[utoipa::path(
    get,
    path = "/prices",
    tag = "Prices",
    operation_id = "getPrices",
    summary = "Lowest observed market price per collector number",
    description = "Best-effort scrape of the marketplace listing pages. \
        Pages that fail to load simply contribute no data; the endpoint \
        itself never fails. Results are cached with a TTL; `force=true` \
        bypasses the cache.",
    params(PricesQuery),
    responses(
        (status = 200, description = "Price map", body = PricesResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_prices(
    State(state): State<AppState>,
    Query(query): Query<PricesQuery>,
) -> Json<PricesResponse> {
    let force = query.force.unwrap_or(false);
    let (prices, cached) = state
        .prices
        .get(force, state.price_source.as_ref())
        .await;
    Json(PricesResponse { prices, cached })
}
