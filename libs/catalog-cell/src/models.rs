// libs/catalog-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use availability_cell::models::{BookingRules, OpeningHours};

// ==============================================================================
// SERVICE CATALOG MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_min: i64,
    pub price_min: Option<i64>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_min: i64,
    pub price_min: Option<i64>,
}

// ==============================================================================
// STAFF MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffRequest {
    pub full_name: String,
}

// ==============================================================================
// BUSINESS SETTINGS MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub id: Uuid,
    pub business_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
    #[serde(default)]
    pub booking_rules: BookingRules,
    pub timezone: String,
}

/// Editable business fields. Opening hours and timezone change through
/// dedicated migrations, not this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub booking_rules: Option<BookingRules>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Service not found")]
    ServiceNotFound,

    #[error("Staff member not found")]
    StaffNotFound,

    #[error("Business settings not found")]
    SettingsNotFound,

    #[error("Service has existing appointments and cannot be deleted")]
    ServiceInUse,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
