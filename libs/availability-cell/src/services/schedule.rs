// libs/availability-cell/src/services/schedule.rs
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AvailabilityError, BookedInterval, BusinessSettings, DayAvailability};
use crate::services::slots::compute_slots;

pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Compute the slot grid for one calendar day and service.
    ///
    /// Existing bookings are filtered by date and confirmed status only.
    /// A requested staff member does not narrow the filter: the clinic
    /// is treated as a single resource pool, so staff-specific conflicts
    /// are not detected here.
    pub async fn day_availability(
        &self,
        date: NaiveDate,
        service_id: Uuid,
    ) -> Result<DayAvailability, AvailabilityError> {
        debug!("Computing availability for service {} on {}", service_id, date);

        let settings = self.get_settings().await?;
        let duration_min = self.get_service_duration(service_id).await?;
        let booked = self.get_confirmed_for_date(date).await?;

        let opening = settings.opening_hours.for_weekday(date.weekday());

        let slots = compute_slots(
            date,
            opening,
            &settings.booking_rules,
            duration_min,
            &booked,
            Utc::now(),
        )?;

        debug!("Computed {} candidate slots for {}", slots.len(), date);

        Ok(DayAvailability {
            timezone: settings.timezone,
            slots,
        })
    }

    /// Fetch the single settings row. The clinic keeps exactly one.
    pub async fn get_settings(&self) -> Result<BusinessSettings, AvailabilityError> {
        let path = "/rest/v1/settings?select=opening_hours,booking_rules,timezone&limit=1";
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None)
            .await
            .map_err(|e| AvailabilityError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or(AvailabilityError::SettingsNotFound)?;

        serde_json::from_value(row).map_err(|e| {
            AvailabilityError::InvalidSchedule(format!("settings row has unexpected shape: {e}"))
        })
    }

    pub async fn get_service_duration(&self, service_id: Uuid) -> Result<i64, AvailabilityError> {
        let path = format!("/rest/v1/services?id=eq.{}&select=duration_min", service_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AvailabilityError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or(AvailabilityError::ServiceNotFound)?;

        row["duration_min"].as_i64().ok_or_else(|| {
            AvailabilityError::InvalidSchedule("service row is missing duration_min".to_string())
        })
    }

    /// Confirmed appointments whose start falls within the day window.
    async fn get_confirmed_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<BookedInterval>, AvailabilityError> {
        let start_of_day = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end_of_day = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?select=start_at,end_at&status=eq.confirmed&start_at=gte.{}&start_at=lte.{}",
            urlencoding::encode(&start_of_day.to_rfc3339()),
            urlencoding::encode(&end_of_day.to_rfc3339()),
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AvailabilityError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    AvailabilityError::InvalidSchedule(format!(
                        "appointment row has unexpected shape: {e}"
                    ))
                })
            })
            .collect()
    }
}
