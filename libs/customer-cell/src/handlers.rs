// libs/customer-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::CustomerError;
use crate::services::customers::CustomerService;

#[derive(Debug, Deserialize)]
pub struct CustomerQuery {
    pub search: Option<String>,
}

#[axum::debug_handler]
pub async fn list_customers(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Value>, AppError> {
    let customer_service = CustomerService::new(&state);

    let customers = customer_service
        .list_customers(query.search.as_deref())
        .await
        .map_err(|CustomerError::DatabaseError(msg)| AppError::Database(msg))?;

    Ok(Json(json!({ "customers": customers })))
}
