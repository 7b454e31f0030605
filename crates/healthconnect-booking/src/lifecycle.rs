//! Appointment status lifecycle with validated transitions.
//!
//! Enforces the one-directional lifecycle:
//! Scheduled -> Completed | Cancelled. Terminal states are never re-opened.

use healthconnect_core::types::AppointmentStatus;

use crate::error::BookingError;

/// Validate that a status transition is allowed.
///
/// Valid transitions:
/// - Scheduled -> Completed
/// - Scheduled -> Cancelled
pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<(), BookingError> {
    let valid = matches!(
        (from, to),
        (AppointmentStatus::Scheduled, AppointmentStatus::Completed)
            | (AppointmentStatus::Scheduled, AppointmentStatus::Cancelled)
    );

    if valid {
        Ok(())
    } else {
        Err(BookingError::InvalidTransition(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Valid transitions ----

    #[test]
    fn test_scheduled_to_completed() {
        assert!(
            validate_transition(AppointmentStatus::Scheduled, AppointmentStatus::Completed)
                .is_ok()
        );
    }

    #[test]
    fn test_scheduled_to_cancelled() {
        assert!(
            validate_transition(AppointmentStatus::Scheduled, AppointmentStatus::Cancelled)
                .is_ok()
        );
    }

    // ---- Invalid transitions ----

    #[test]
    fn test_scheduled_to_scheduled_invalid() {
        assert!(
            validate_transition(AppointmentStatus::Scheduled, AppointmentStatus::Scheduled)
                .is_err()
        );
    }

    #[test]
    fn test_completed_to_anything_invalid() {
        assert!(
            validate_transition(AppointmentStatus::Completed, AppointmentStatus::Scheduled)
                .is_err()
        );
        assert!(
            validate_transition(AppointmentStatus::Completed, AppointmentStatus::Cancelled)
                .is_err()
        );
        assert!(
            validate_transition(AppointmentStatus::Completed, AppointmentStatus::Completed)
                .is_err()
        );
    }

    #[test]
    fn test_cancelled_to_anything_invalid() {
        assert!(
            validate_transition(AppointmentStatus::Cancelled, AppointmentStatus::Scheduled)
                .is_err()
        );
        assert!(
            validate_transition(AppointmentStatus::Cancelled, AppointmentStatus::Completed)
                .is_err()
        );
        assert!(
            validate_transition(AppointmentStatus::Cancelled, AppointmentStatus::Cancelled)
                .is_err()
        );
    }

    // ---- Error message ----

    #[test]
    fn test_invalid_transition_error_message() {
        let err = validate_transition(AppointmentStatus::Completed, AppointmentStatus::Scheduled)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("completed"), "Error should mention source state");
        assert!(msg.contains("scheduled"), "Error should mention target state");
    }

    #[test]
    fn test_all_valid_transitions_count() {
        // There are exactly 2 valid transitions
        let all_states = [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ];

        let mut valid_count = 0;
        for from in &all_states {
            for to in &all_states {
                if validate_transition(*from, *to).is_ok() {
                    valid_count += 1;
                }
            }
        }
        assert_eq!(valid_count, 2, "Expected exactly 2 valid transitions");
    }
}
