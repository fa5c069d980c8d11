use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Single-admin deployment: one password, no user table.
    pub admin_password: String,
    pub session_secret: String,
    pub session_max_age_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Path to the tab-separated reference list, re-read on every request.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    pub ttl_secs: u64,
    /// Number of marketplace listing pages to scan per refresh.
    pub pages: u32,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.session_max_age_secs", 7 * 24 * 3600)?
            .set_default("catalog.path", "data/catalog.txt")?
            .set_default("pricing.ttl_secs", 2 * 3600)?
            .set_default("pricing.pages", 10)?
            .set_default(
                "pricing.base_url",
                "https://www.cardmarket.com/en/Riftbound/Products/Singles/Origins",
            )?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., BINDER__AUTH__ADMIN_PASSWORD)
            .add_source(Environment::with_prefix("BINDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
