// libs/availability-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AvailabilityError;
use crate::services::schedule::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<NaiveDate>,
    #[serde(rename = "serviceId")]
    pub service_id: Option<Uuid>,
    /// Accepted for forward compatibility with staff selection in the
    /// booking wizard. Slots are computed against every confirmed
    /// booking for the day, not per staff member.
    #[serde(rename = "staffId")]
    pub staff_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let (Some(date), Some(service_id)) = (query.date, query.service_id) else {
        return Err(AppError::BadRequest("date and serviceId are required".to_string()));
    };

    if let Some(staff_id) = query.staff_id {
        debug!("staff filter {} requested; slots are computed clinic-wide", staff_id);
    }

    let service = AvailabilityService::new(&state);

    let day = service
        .day_availability(date, service_id)
        .await
        .map_err(|e| match e {
            AvailabilityError::SettingsNotFound | AvailabilityError::ServiceNotFound => {
                AppError::Internal("Settings or service not found".to_string())
            }
            AvailabilityError::InvalidSchedule(msg) => AppError::Internal(msg),
            AvailabilityError::DatabaseError(msg) => AppError::Database(msg),
        })?;

    Ok(Json(json!({
        "timezone": day.timezone,
        "slots": day.slots,
    })))
}
