use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Level, info};

use server::config::AppConfig;
use server::pricing::{CardmarketSource, PriceCache};
use server::state::AppState;
use server::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Arc::new(AppConfig::load()?);
    let db = database::init_db(&config.database.url).await?;

    let state = AppState {
        db,
        prices: Arc::new(PriceCache::new(Duration::from_secs(config.pricing.ttl_secs))),
        price_source: Arc::new(CardmarketSource::new(&config.pricing)),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
