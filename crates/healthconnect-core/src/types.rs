use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Role attached to a registered user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Books and views their own appointments.
    Patient,
    /// Manages a schedule and sees assigned appointments.
    Doctor,
    /// Manages users and the specialty directory.
    Admin,
}

/// Appointment lifecycle status.
///
/// Transitions are one-directional: `Scheduled` may move to `Completed` or
/// `Cancelled`; neither terminal state is ever re-opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Where a booking originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentSource {
    /// Created through the conversational assistant.
    Chatbot,
    /// Created through the standalone booking form.
    Form,
    /// Created from the dashboard.
    Dashboard,
}

/// Whether a schedule slot is open for booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Unavailable,
}

// =============================================================================
// Records
// =============================================================================

/// The authenticated actor on whose behalf operations run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: UserRole,
}

impl Identity {
    /// Name to stamp on records: display name, then email, then a generic
    /// fallback.
    pub fn record_name(&self) -> String {
        if !self.display_name.trim().is_empty() {
            self.display_name.clone()
        } else if let Some(email) = &self.email {
            email.clone()
        } else {
            "Patient".to_string()
        }
    }
}

/// Durable appointment record, as stored in the `appointments` collection.
///
/// Field names serialize camelCase to match the store's document shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub specialty: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Slot label, e.g. `10:00 AM`.
    pub time: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub source: AppointmentSource,
}

/// A doctor as presented during selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRef {
    pub id: String,
    pub name: String,
}

/// A registered doctor, as stored in the `doctors` collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

impl From<DoctorProfile> for DoctorRef {
    fn from(profile: DoctorProfile) -> Self {
        DoctorRef {
            id: profile.id,
            name: profile.name,
        }
    }
}

/// One working window for a doctor on a calendar date, as stored in the
/// `doctorSchedules` collection.
///
/// At most one document exists per (doctor, date); submitting a new window
/// replaces the old one. `start_time` strictly precedes `end_time`; both are
/// 24-hour `HH:MM` strings, so lexicographic order is chronological order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub doctor_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Day-of-week label, e.g. `Monday`.
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Tests
// =============================================================================
