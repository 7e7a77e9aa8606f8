// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentStatus, BookingError};

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed.
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), BookingError> {
        debug!("Validating status transition {} -> {}", current_status, new_status);

        let valid_transitions = self.valid_transitions(current_status);

        if !valid_transitions.contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(BookingError::InvalidStatusTransition(current_status));
        }

        Ok(())
    }

    /// Confirmed appointments can complete, cancel, or no-show.
    /// Everything else is terminal.
    pub fn valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
            AppointmentStatus::NoShow => vec![],
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_can_complete_cancel_or_no_show() {
        let lifecycle = AppointmentLifecycleService::new();

        for target in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert!(lifecycle
                .validate_status_transition(AppointmentStatus::Confirmed, target)
                .is_ok());
        }
    }

    #[test]
    fn terminal_states_reject_all_transitions() {
        let lifecycle = AppointmentLifecycleService::new();

        for current in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            let result =
                lifecycle.validate_status_transition(current, AppointmentStatus::Confirmed);
            assert!(matches!(result, Err(BookingError::InvalidStatusTransition(_))));
        }
    }
}
