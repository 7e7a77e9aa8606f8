// libs/catalog-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Service catalog, staff roster and business settings. The public
/// wizard only ever reads active services; everything else is admin.
pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/services", get(handlers::list_active_services));

    let admin_routes = Router::new()
        .route("/services", post(handlers::create_service))
        .route("/services/all", get(handlers::list_all_services))
        .route("/services/{service_id}", delete(handlers::delete_service))
        .route("/staff", get(handlers::list_staff))
        .route("/staff", post(handlers::create_staff))
        .route("/staff/{staff_id}", delete(handlers::delete_staff))
        .route("/settings", get(handlers::get_settings))
        .route("/settings", put(handlers::update_settings))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
