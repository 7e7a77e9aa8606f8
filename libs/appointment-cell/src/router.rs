// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Public booking route plus the JWT-protected admin operations.
pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/", post(handlers::book_appointment));

    let admin_routes = Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/stats", get(handlers::get_dashboard_stats))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
