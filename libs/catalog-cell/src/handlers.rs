// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CatalogError, CreateServiceRequest, CreateStaffRequest, UpdateSettingsRequest};
use crate::services::catalog::CatalogService;
use crate::services::settings::SettingsService;

fn map_catalog_error(e: CatalogError) -> AppError {
    match e {
        CatalogError::ServiceNotFound => AppError::NotFound("Service not found".to_string()),
        CatalogError::StaffNotFound => AppError::NotFound("Staff member not found".to_string()),
        CatalogError::SettingsNotFound => {
            AppError::NotFound("Business settings not found".to_string())
        }
        CatalogError::ServiceInUse => AppError::Conflict(
            "Service has existing appointments. Deactivate it instead of deleting.".to_string(),
        ),
        CatalogError::Validation(msg) => AppError::ValidationError(msg),
        CatalogError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// SERVICES
// ==============================================================================

/// Public listing backing the booking wizard's first step.
#[axum::debug_handler]
pub async fn list_active_services(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let services = catalog
        .list_active_services()
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "services": services })))
}

#[axum::debug_handler]
pub async fn list_all_services(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let services = catalog.list_all_services().await.map_err(map_catalog_error)?;

    Ok(Json(json!({ "services": services })))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let catalog = CatalogService::new(&state);
    let service = catalog.create_service(request).await.map_err(map_catalog_error)?;

    Ok((StatusCode::CREATED, Json(json!({ "service": service }))))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    catalog.delete_service(service_id).await.map_err(map_catalog_error)?;

    Ok(Json(json!({ "success": true })))
}

// ==============================================================================
// STAFF
// ==============================================================================

#[axum::debug_handler]
pub async fn list_staff(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let staff = catalog.list_staff().await.map_err(map_catalog_error)?;

    Ok(Json(json!({ "staff": staff })))
}

#[axum::debug_handler]
pub async fn create_staff(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let catalog = CatalogService::new(&state);
    let staff = catalog.create_staff(request).await.map_err(map_catalog_error)?;

    Ok((StatusCode::CREATED, Json(json!({ "staff": staff }))))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(state): State<Arc<AppConfig>>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    catalog.delete_staff(staff_id).await.map_err(map_catalog_error)?;

    Ok(Json(json!({ "success": true })))
}

// ==============================================================================
// SETTINGS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_settings(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let settings_service = SettingsService::new(&state);
    let settings = settings_service.get_settings().await.map_err(map_catalog_error)?;

    Ok(Json(json!({ "settings": settings })))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<Value>, AppError> {
    let settings_service = SettingsService::new(&state);
    let settings = settings_service
        .update_settings(request)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "settings": settings })))
}
