// libs/customer-cell/src/router.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Customer records are admin-only.
pub fn customer_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_customers))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
