// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, AppointmentSummary, BookAppointmentRequest, BookingError,
    CustomerDetails, DashboardStats, ListFilter,
};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
    lifecycle_service: AppointmentLifecycleService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self {
            supabase,
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Book a slot for a customer.
    ///
    /// The overlap check and the insert run as one stored procedure on
    /// the database side, so two racing requests for the same slot
    /// cannot both succeed: the loser gets the store's overlap signal,
    /// surfaced here as `SlotTaken`. Nothing is written on any error
    /// path.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        let (service_id, start_at, details) = validate_booking_request(request)?;

        info!("Booking appointment for service {} at {}", service_id, start_at);

        let duration_min = self.get_service_duration(service_id).await?;
        let end_at = start_at + ChronoDuration::minutes(duration_min);

        let params = json!({
            "p_customer_name": details.full_name,
            "p_customer_phone": details.phone,
            "p_customer_email": details.email,
            "p_service_id": service_id,
            "p_staff_id": details.staff_id,
            "p_start_at": start_at.to_rfc3339(),
            "p_end_at": end_at.to_rfc3339(),
        });

        let result: Value = self
            .supabase
            .rpc("book_appointment", params)
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("OVERLAP_ERROR") {
                    warn!("Booking rejected, slot already taken: {} - {}", start_at, end_at);
                    BookingError::SlotTaken
                } else {
                    BookingError::DatabaseError(message)
                }
            })?;

        let appointment: Appointment = serde_json::from_value(result).map_err(|e| {
            BookingError::DatabaseError(format!("Failed to parse created appointment: {}", e))
        })?;

        info!("Appointment {} booked for {}", appointment.id, appointment.start_at);
        Ok(appointment)
    }

    /// List appointments for the admin console, joined with customer and
    /// service details, ascending by start time.
    pub async fn list_appointments(
        &self,
        filter: ListFilter,
    ) -> Result<Vec<AppointmentSummary>, BookingError> {
        debug!("Listing appointments with filter {:?}", filter);

        let mut path = "/rest/v1/appointments?select=id,start_at,end_at,status,\
                        customer:customers(full_name,phone),service:services(name,duration_min)\
                        &order=start_at.asc"
            .to_string();

        if filter == ListFilter::Upcoming {
            let now = Utc::now();
            path.push_str(&format!(
                "&start_at=gte.{}&status=eq.confirmed",
                urlencoding::encode(&now.to_rfc3339())
            ));
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    BookingError::DatabaseError(format!("Failed to parse appointment row: {}", e))
                })
            })
            .collect()
    }

    /// Admin status transition: completed / cancelled / no_show.
    /// Rows leaving `confirmed` stop blocking availability slots.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        debug!("Updating appointment {} to {}", appointment_id, new_status);

        let current = self.get_appointment(appointment_id).await?;

        self.lifecycle_service
            .validate_status_transition(current.status, new_status)?;

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "status": new_status.to_string() })),
                Some(headers),
            )
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or(BookingError::AppointmentNotFound)?;

        let updated: Appointment = serde_json::from_value(row).map_err(|e| {
            BookingError::DatabaseError(format!("Failed to parse updated appointment: {}", e))
        })?;

        info!("Appointment {} moved to {}", appointment_id, updated.status);
        Ok(updated)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or(BookingError::AppointmentNotFound)?;

        serde_json::from_value(row).map_err(|e| {
            BookingError::DatabaseError(format!("Failed to parse appointment: {}", e))
        })
    }

    /// Dashboard counters: today's and upcoming confirmed appointments,
    /// plus the total customer count.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, BookingError> {
        let now = Utc::now();
        let today = now.date_naive();
        let start_of_today = today.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end_of_today = today.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();

        let today_appointments = self
            .count_rows(&format!(
                "/rest/v1/appointments?select=id&status=eq.confirmed&start_at=gte.{}&start_at=lte.{}",
                urlencoding::encode(&start_of_today.to_rfc3339()),
                urlencoding::encode(&end_of_today.to_rfc3339()),
            ))
            .await?;

        let upcoming_appointments = self
            .count_rows(&format!(
                "/rest/v1/appointments?select=id&status=eq.confirmed&start_at=gte.{}",
                urlencoding::encode(&now.to_rfc3339()),
            ))
            .await?;

        let total_customers = self.count_rows("/rest/v1/customers?select=id").await?;

        Ok(DashboardStats {
            today_appointments,
            upcoming_appointments,
            total_customers,
        })
    }

    async fn count_rows(&self, path: &str) -> Result<i64, BookingError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(result.len() as i64)
    }

    async fn get_service_duration(&self, service_id: Uuid) -> Result<i64, BookingError> {
        let path = format!("/rest/v1/services?id=eq.{}&select=duration_min", service_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(BookingError::ServiceNotFound)?;

        row["duration_min"]
            .as_i64()
            .ok_or_else(|| BookingError::DatabaseError("service row is missing duration_min".to_string()))
    }
}

struct ValidatedBooking {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub staff_id: Option<Uuid>,
}

/// Presence checks for the public booking payload. The end time is never
/// taken from the caller; it is re-derived from the service duration.
fn validate_booking_request(
    request: BookAppointmentRequest,
) -> Result<(Uuid, DateTime<Utc>, ValidatedBooking), BookingError> {
    let service_id = request
        .service_id
        .ok_or_else(|| BookingError::Validation("serviceId is required".to_string()))?;
    let start_at = request
        .start_at
        .ok_or_else(|| BookingError::Validation("startAt is required".to_string()))?;
    let customer: CustomerDetails = request
        .customer
        .ok_or_else(|| BookingError::Validation("customer details are required".to_string()))?;

    if customer.full_name.trim().is_empty()
        || customer.email.trim().is_empty()
        || customer.phone.trim().is_empty()
    {
        return Err(BookingError::Validation(
            "customer fullName, email and phone are required".to_string(),
        ));
    }

    Ok((
        service_id,
        start_at,
        ValidatedBooking {
            full_name: customer.full_name,
            email: customer.email,
            phone: customer.phone,
            staff_id: request.staff_id,
        },
    ))
}
