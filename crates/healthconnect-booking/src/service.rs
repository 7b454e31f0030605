//! The appointment access layer façade.
//!
//! Everything the booking conversation (and the dashboards) needs from the
//! backend: directory reads, slot computation, appointment creation and
//! lifecycle. Directory reads degrade to empty lists on storage failure;
//! `create_appointment` never lets an error escape its boundary.

use std::sync::Arc;

use chrono::{NaiveTime, Timelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use healthconnect_core::types::{
    Appointment, AppointmentSource, AppointmentStatus, DoctorProfile, DoctorRef, ScheduleSlot,
    UserRole,
};
use healthconnect_store::collections::{APPOINTMENTS, DOCTORS, DOCTOR_SCHEDULES, SPECIALTIES};
use healthconnect_store::{Document, DocumentStore};

use crate::error::BookingError;
use crate::identity::IdentityProvider;
use crate::lifecycle::validate_transition;
use crate::schedule::slot_labels;

/// The fields assembled by a booking surface before creation.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingRequest {
    pub specialty: String,
    pub doctor_id: String,
    pub doctor_name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Slot label, e.g. `10:00 AM`.
    pub time: String,
    pub source: AppointmentSource,
}

/// Result of an appointment creation attempt.
///
/// Creation failures are data, not errors: the surface renders `message`
/// either way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}

impl BookingOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            appointment_id: None,
        }
    }
}

/// Access layer over the document store and identity provider.
pub struct AppointmentService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// All specialty names. Falls back to an empty list on storage errors.
    pub async fn list_specialties(&self) -> Vec<String> {
        match self.store.find_eq(SPECIALTIES, &[]).await {
            Ok(docs) => docs
                .into_iter()
                .filter_map(|doc| {
                    doc.body
                        .get("name")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch specialties");
                vec![]
            }
        }
    }

    /// Doctors registered under the given specialty (exact match). Empty on
    /// storage errors or when none are registered.
    pub async fn list_doctors(&self, specialty: &str) -> Vec<DoctorRef> {
        match self
            .store
            .find_eq(DOCTORS, &[("specialty", json!(specialty))])
            .await
        {
            Ok(docs) => docs
                .into_iter()
                .filter_map(|doc| parse_doc::<DoctorProfile>(doc).map(DoctorRef::from))
                .collect(),
            Err(e) => {
                warn!(error = %e, specialty, "Failed to fetch doctors");
                vec![]
            }
        }
    }

    /// Bookable time labels for (doctor, date), computed from the doctor's
    /// schedule window. Empty on storage errors or when nothing is open.
    pub async fn list_available_slots(&self, doctor_id: &str, date: &str) -> Vec<String> {
        match self
            .store
            .find_eq(
                DOCTOR_SCHEDULES,
                &[("doctorId", json!(doctor_id)), ("date", json!(date))],
            )
            .await
        {
            Ok(docs) => docs
                .into_iter()
                .filter_map(parse_doc::<ScheduleSlot>)
                .flat_map(|slot| slot_labels(&slot))
                .collect(),
            Err(e) => {
                warn!(error = %e, doctor_id, date, "Failed to fetch schedule");
                vec![]
            }
        }
    }

    /// Create an appointment for the signed-in patient.
    ///
    /// Never returns an error: missing identity, serialization trouble, and
    /// store failures all come back as a failed [`BookingOutcome`].
    pub async fn create_appointment(&self, request: BookingRequest) -> BookingOutcome {
        let Some(identity) = self.identity.current_identity() else {
            return BookingOutcome::failure("You must be signed in to book an appointment.");
        };

        let id = format!("APT{}", rand::rng().random_range(0..10_000));
        let appointment = Appointment {
            id: id.clone(),
            patient_id: identity.uid.clone(),
            patient_name: identity.record_name(),
            doctor_id: request.doctor_id,
            doctor_name: request.doctor_name,
            specialty: request.specialty,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
            source: request.source,
        };

        let body = match serde_json::to_value(&appointment) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to serialize appointment");
                return BookingOutcome::failure("Failed to book appointment. Please try again later.");
            }
        };

        match self.store.put(APPOINTMENTS, &id, body).await {
            Ok(()) => {
                info!(appointment_id = %id, patient_id = %identity.uid, "Appointment booked");
                BookingOutcome {
                    success: true,
                    message: "Appointment booked successfully".to_string(),
                    appointment_id: Some(id),
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to store appointment");
                BookingOutcome::failure(format!("Failed to book appointment: {}", e))
            }
        }
    }

    /// Appointments owned by the signed-in patient, in store order.
    pub async fn list_my_appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        let identity = self
            .identity
            .current_identity()
            .ok_or(BookingError::NotSignedIn)?;

        let docs = self
            .store
            .find_eq(APPOINTMENTS, &[("patientId", json!(identity.uid))])
            .await?;
        Ok(docs.into_iter().filter_map(parse_doc).collect())
    }

    /// Appointments assigned to the signed-in doctor, in store order.
    pub async fn list_for_doctor(&self) -> Result<Vec<Appointment>, BookingError> {
        let identity = self
            .identity
            .current_identity()
            .ok_or(BookingError::NotSignedIn)?;
        if identity.role != UserRole::Doctor {
            return Err(BookingError::Forbidden(
                "only doctors can list assigned appointments".to_string(),
            ));
        }

        let docs = self
            .store
            .find_eq(APPOINTMENTS, &[("doctorId", json!(identity.uid))])
            .await?;
        Ok(docs.into_iter().filter_map(parse_doc).collect())
    }

    /// Move an appointment to a new status.
    ///
    /// Only the owning patient or the assigned doctor may do this, and only
    /// along the one-directional lifecycle.
    pub async fn update_status(
        &self,
        appointment_id: &str,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        let identity = self
            .identity
            .current_identity()
            .ok_or(BookingError::NotSignedIn)?;

        let body = self
            .store
            .get(APPOINTMENTS, appointment_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(appointment_id.to_string()))?;
        let mut appointment: Appointment = serde_json::from_value(body)?;

        if identity.uid != appointment.patient_id && identity.uid != appointment.doctor_id {
            return Err(BookingError::Forbidden(
                "appointment belongs to another patient".to_string(),
            ));
        }

        validate_transition(appointment.status, new_status)?;
        appointment.status = new_status;

        self.store
            .put(
                APPOINTMENTS,
                appointment_id,
                serde_json::to_value(&appointment)?,
            )
            .await?;
        info!(appointment_id, status = %new_status, "Appointment status updated");
        Ok(appointment)
    }
}

/// Sort appointments by date, then time of day, ascending - the
/// presentation order.
pub fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| time_sort_key(&a.time).cmp(&time_sort_key(&b.time)))
    });
}

/// Seconds-from-midnight key for a `h:MM AM/PM` label; unparseable labels
/// sort last by text.
fn time_sort_key(label: &str) -> (u32, String) {
    match NaiveTime::parse_from_str(label, "%I:%M %p") {
        Ok(t) => (t.num_seconds_from_midnight(), String::new()),
        Err(_) => (u32::MAX, label.to_string()),
    }
}

fn parse_doc<T: serde::de::DeserializeOwned>(doc: Document) -> Option<T> {
    match serde_json::from_value(doc.body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(id = %doc.id, error = %e, "Skipping malformed document");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
