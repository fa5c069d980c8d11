use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(handlers::catalog::list_catalog))
        .route(
            "/collection",
            get(handlers::collection::list_collection).patch(handlers::collection::update_status),
        )
        .route("/collection/status", get(handlers::collection::status_map))
        .route("/missing", get(handlers::missing::get_missing))
        .route("/prices", get(handlers::prices::get_prices))
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::admin::login))
        .route("/logout", post(handlers::admin::logout))
        .route("/ping", get(handlers::admin::ping))
        .route("/verify", get(handlers::admin::verify))
        .route("/sync", post(handlers::admin::sync))
}
