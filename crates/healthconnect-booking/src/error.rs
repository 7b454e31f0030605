//! Error types for the appointment access layer.

use healthconnect_core::error::HealthConnectError;
use healthconnect_core::types::AppointmentStatus;

/// Errors from the access layer.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("you must be signed in")]
    NotSignedIn,
    #[error("appointment not found: {0}")]
    NotFound(String),
    #[error("invalid status transition: {0} -> {1}")]
    InvalidTransition(AppointmentStatus, AppointmentStatus),
    #[error("not allowed: {0}")]
    Forbidden(String),
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<HealthConnectError> for BookingError {
    fn from(err: HealthConnectError) -> Self {
        BookingError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        BookingError::Serialization(err.to_string())
    }
}

impl From<BookingError> for HealthConnectError {
    fn from(err: BookingError) -> Self {
        HealthConnectError::Booking(err.to_string())
    }
}
