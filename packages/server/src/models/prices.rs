use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PricesQuery {
    /// Bypass the TTL cache and scrape fresh data.
    pub force: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct PricesResponse {
    /// Lowest observed price per collector number, in euros.
    pub prices: HashMap<String, f64>,
    /// Whether the response was served from the TTL cache.
    pub cached: bool,
}
