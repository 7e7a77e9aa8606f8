// libs/availability-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Public routes: the booking wizard queries availability anonymously.
pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::get_availability))
        .with_state(state)
}
