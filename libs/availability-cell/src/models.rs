// libs/availability-cell/src/models.rs
use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ==============================================================================
// BUSINESS CALENDAR MODELS
// ==============================================================================

/// One contiguous span of a business day during which appointments may
/// start, stored as local wall-clock "HH:MM" strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningInterval {
    pub start: String,
    pub end: String,
}

impl OpeningInterval {
    /// Parse both bounds, rejecting anything that is not "HH:MM".
    /// Stored rows are loosely typed JSON, so the shape check lives here
    /// at the boundary instead of being coerced downstream.
    pub fn wall_clock_bounds(&self) -> Result<(NaiveTime, NaiveTime), AvailabilityError> {
        let start = parse_wall_clock(&self.start)?;
        let end = parse_wall_clock(&self.end)?;
        Ok((start, end))
    }
}

pub fn parse_wall_clock(value: &str) -> Result<NaiveTime, AvailabilityError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AvailabilityError::InvalidSchedule(format!("invalid wall-clock time: {value}")))
}

/// Weekday-keyed opening intervals, e.g. `{"mon": [{"start": "10:00", ...}]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningHours(pub HashMap<String, Vec<OpeningInterval>>);

impl OpeningHours {
    pub fn for_weekday(&self, weekday: Weekday) -> &[OpeningInterval] {
        self.0
            .get(weekday_key(weekday))
            .map(|intervals| intervals.as_slice())
            .unwrap_or(&[])
    }
}

/// Short weekday keys as the settings row stores them (Sunday first).
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "sun",
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRules {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: i64,
    /// Parsed and carried, but not applied during slot generation.
    #[serde(default)]
    pub buffer_minutes: i64,
    #[serde(default)]
    pub min_notice_minutes: i64,
}

fn default_slot_minutes() -> i64 {
    30
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            buffer_minutes: 0,
            min_notice_minutes: 0,
        }
    }
}

impl BookingRules {
    pub fn validate(&self) -> Result<(), AvailabilityError> {
        if self.slot_minutes <= 0 {
            return Err(AvailabilityError::InvalidSchedule(
                "slot_minutes must be positive".to_string(),
            ));
        }
        if self.buffer_minutes < 0 || self.min_notice_minutes < 0 {
            return Err(AvailabilityError::InvalidSchedule(
                "booking rule minutes cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// The slice of the settings row the calculator needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    #[serde(default)]
    pub opening_hours: OpeningHours,
    #[serde(default)]
    pub booking_rules: BookingRules,
    pub timezone: String,
}

// ==============================================================================
// SLOT MODELS
// ==============================================================================

/// A confirmed appointment reduced to the interval that blocks slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedInterval {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// A candidate bookable interval. Computed per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

/// Response payload for a day's availability query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub timezone: String,
    pub slots: Vec<Slot>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Business settings not found")]
    SettingsNotFound,

    #[error("Service not found")]
    ServiceNotFound,

    #[error("Invalid schedule data: {0}")]
    InvalidSchedule(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
