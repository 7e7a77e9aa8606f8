// libs/customer-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer row with embedded appointment history, as the admin
/// console shows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub appointments: Vec<CustomerAppointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAppointment {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub status: String,
    pub service: Option<ServiceName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceName {
    pub name: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CustomerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
