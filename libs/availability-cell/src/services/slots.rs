// libs/availability-cell/src/services/slots.rs
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{AvailabilityError, BookedInterval, BookingRules, OpeningInterval, Slot};

/// Compute the day's candidate slots for a service.
///
/// Walks each opening interval in `slot_minutes` steps and emits every
/// candidate `[start, start + duration)` that fits entirely inside the
/// interval, in ascending order. A candidate is unavailable when it
/// starts before `now + min_notice_minutes` or overlaps a confirmed
/// booking; unavailable candidates are still emitted so the caller can
/// render the full grid. Wall-clock bounds are anchored to `date` on the
/// same fixed UTC basis the stored timestamps use.
pub fn compute_slots(
    date: NaiveDate,
    opening: &[OpeningInterval],
    rules: &BookingRules,
    service_duration_min: i64,
    booked: &[BookedInterval],
    now: DateTime<Utc>,
) -> Result<Vec<Slot>, AvailabilityError> {
    rules.validate()?;
    if service_duration_min <= 0 {
        return Err(AvailabilityError::InvalidSchedule(
            "service duration must be positive".to_string(),
        ));
    }

    let earliest_allowed = now + Duration::minutes(rules.min_notice_minutes);
    let duration = Duration::minutes(service_duration_min);
    let step = Duration::minutes(rules.slot_minutes);

    let mut slots = Vec::new();

    for interval in opening {
        let (open, close) = interval.wall_clock_bounds()?;
        let interval_end = date.and_time(close).and_utc();

        let mut cursor = date.and_time(open).and_utc();

        // Trailing candidates that would run past the interval end are
        // dropped, not clipped.
        while cursor + duration <= interval_end {
            let slot_end = cursor + duration;

            let too_soon = cursor < earliest_allowed;
            let overlaps = booked
                .iter()
                .any(|booking| overlap(cursor, slot_end, booking.start_at, booking.end_at));

            slots.push(Slot {
                start: cursor,
                end: slot_end,
                available: !too_soon && !overlaps,
            });

            cursor += step;
        }
    }

    Ok(slots)
}

/// Half-open interval overlap: touching endpoints do not conflict.
fn overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}
