// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, BookingError, ListFilter, UpdateStatusRequest};
use crate::services::booking::BookingService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: ListFilter,
}

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::Validation(msg) => AppError::ValidationError(msg),
        BookingError::ServiceNotFound => AppError::NotFound("Service not found".to_string()),
        BookingError::AppointmentNotFound => {
            AppError::NotFound("Appointment not found".to_string())
        }
        BookingError::SlotTaken => AppError::Conflict(
            "The selected time slot is no longer available. Please pick another time.".to_string(),
        ),
        BookingError::InvalidStatusTransition(current) => {
            AppError::BadRequest(format!("Appointment cannot change status from {}", current))
        }
        BookingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// Public booking endpoint for the wizard.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .book_appointment(request)
        .await
        .map_err(map_booking_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
        })),
    ))
}

/// Admin listing, joined with customer and service details.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service
        .list_appointments(query.filter)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

/// Admin status transition: completed / cancelled / no_show.
#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .update_status(appointment_id, request.status)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

/// Admin dashboard counters.
#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let stats = booking_service
        .dashboard_stats()
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(stats)))
}
