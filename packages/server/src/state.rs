use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::pricing::{PriceCache, PriceSource};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    /// Explicit, injected price cache; no module-level state.
    pub prices: Arc<PriceCache>,
    pub price_source: Arc<dyn PriceSource>,
}
