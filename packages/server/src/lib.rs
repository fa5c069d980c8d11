pub mod collection;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::extractors::auth::SESSION_COOKIE;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Binder Collection API",
        version = "1.0.0",
        description = "API for the Binder card-collection tracker"
    ),
    servers((url = "/api/v1")),
    paths(
        handlers::catalog::list_catalog,
        handlers::collection::list_collection,
        handlers::collection::status_map,
        handlers::collection::update_status,
        handlers::missing::get_missing,
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::ping,
        handlers::admin::verify,
        handlers::admin::sync,
        handlers::prices::get_prices,
    ),
    tags(
        (name = "Catalog", description = "Reference list of all known cards"),
        (name = "Collection", description = "Ownership status and updates"),
        (name = "Missing", description = "Missing-cards exports"),
        (name = "Admin", description = "Admin session and catalog sync"),
        (name = "Prices", description = "Scraped market prices"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "admin_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .allow_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(cfg.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_store_failure_on_status_update() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let responses = &doc["paths"]["/collection"]["patch"]["responses"];
        assert!(responses.get("503").is_some());
    }

    #[test]
    fn openapi_includes_admin_diagnostics() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/admin/verify"]["get"].is_object());
        assert!(doc["paths"]["/admin/ping"]["get"]["responses"].get("503").is_some());
    }
}
