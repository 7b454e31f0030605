//! The booking dialogue controller.
//!
//! Consumes one turn of user input at a time: validates it, asks the pure
//! decision step what to do, then runs the side effects through the access
//! layer and mutates the caller-owned session. A step only advances once
//! the options for the next step were fetched successfully, so a backend
//! hiccup leaves the user exactly where they were.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use healthconnect_core::config::ChatConfig;
use healthconnect_core::types::{AppointmentSource, DoctorRef};

use healthconnect_booking::{AppointmentService, BookingRequest};

use crate::error::ChatError;
use crate::intent::keyword_reply;
use crate::reply::{self, BotReply};
use crate::session::{BookingSession, BookingStep};
use crate::transition::{decide, StepDecision};

/// Drives booking conversations over the appointment access layer.
pub struct BookingController {
    service: Arc<AppointmentService>,
    max_message_length: usize,
}

impl BookingController {
    /// Create a controller over the given access layer.
    pub fn new(service: Arc<AppointmentService>, config: &ChatConfig) -> Self {
        Self {
            service,
            max_message_length: config.max_message_length,
        }
    }

    /// Handle one turn of user input.
    ///
    /// Returns the assistant's replies for this turn. While a turn is in
    /// flight the session is marked loading and further input is refused
    /// with a holding reply, without touching the session.
    pub async fn handle_message(
        &self,
        session: &mut BookingSession,
        input: &str,
    ) -> Result<Vec<BotReply>, ChatError> {
        if session.loading {
            return Ok(vec![reply::busy()]);
        }
        if input.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if input.len() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let turn = session.begin_turn();
        debug!(session_id = %session.id, turn, step = ?session.step, "Processing turn");

        let result = self.process(session, input).await;

        session.end_turn();
        session.last_message_at = Utc::now();
        result
    }

    async fn process(
        &self,
        session: &mut BookingSession,
        input: &str,
    ) -> Result<Vec<BotReply>, ChatError> {
        match decide(session, input) {
            StepDecision::StartBooking => self.start(session).await,
            StepDecision::SmallTalk => Ok(vec![match keyword_reply(input) {
                Some(text) => BotReply::text(text),
                None => reply::fallback(),
            }]),
            StepDecision::SelectSpecialty(specialty) => {
                self.select_specialty(session, specialty).await
            }
            StepDecision::SelectDoctor(doctor) => Ok(Self::select_doctor(session, doctor)),
            StepDecision::SelectDate(date) => self.select_date(session, date).await,
            StepDecision::SelectTime(time) => Self::select_time(session, time),
            StepDecision::Confirm => self.confirm(session).await,
            StepDecision::Cancel => {
                info!(session_id = %session.id, "Booking cancelled by user");
                session.reset();
                Ok(vec![reply::cancelled()])
            }
            StepDecision::RetryConfirmation => Ok(vec![reply::confirmation_retry()]),
            StepDecision::NotRecognized => Ok(vec![Self::retry_current_step(session)]),
            StepDecision::InvalidDate => Ok(vec![reply::date_retry()]),
        }
    }

    /// Enter the specialty step, presenting the fetched specialty list.
    ///
    /// An empty list (backend down or directory unseeded) leaves the
    /// session idle.
    async fn start(&self, session: &mut BookingSession) -> Result<Vec<BotReply>, ChatError> {
        let specialties = self.service.list_specialties().await;
        if specialties.is_empty() {
            return Ok(vec![reply::booking_unavailable()]);
        }

        session.active = true;
        session.step = BookingStep::Specialty;
        session.specialty_options = specialties.clone();
        info!(session_id = %session.id, "Booking conversation started");
        Ok(vec![reply::specialty_prompt(&specialties)])
    }

    async fn select_specialty(
        &self,
        session: &mut BookingSession,
        specialty: String,
    ) -> Result<Vec<BotReply>, ChatError> {
        let doctors = self.service.list_doctors(&specialty).await;
        if doctors.is_empty() {
            // Stay on the specialty step; nothing was recorded.
            return Ok(vec![reply::no_doctors(&specialty)]);
        }

        let prompt = reply::doctor_prompt(&specialty, &doctors);
        session.specialty = Some(specialty);
        session.doctor_options = doctors;
        session.step = BookingStep::Doctor;
        Ok(vec![prompt])
    }

    fn select_doctor(session: &mut BookingSession, doctor: DoctorRef) -> Vec<BotReply> {
        let prompt = reply::date_prompt(&doctor.name);
        session.doctor = Some(doctor);
        session.step = BookingStep::Date;
        vec![prompt]
    }

    async fn select_date(
        &self,
        session: &mut BookingSession,
        date: String,
    ) -> Result<Vec<BotReply>, ChatError> {
        let doctor = session
            .doctor
            .as_ref()
            .ok_or_else(|| ChatError::Session("date step without a doctor".to_string()))?;

        let slots = self.service.list_available_slots(&doctor.id, &date).await;
        if slots.is_empty() {
            // Stay on the date step; the date was not recorded.
            return Ok(vec![reply::no_slots(&date)]);
        }

        let prompt = reply::slot_prompt(&date, &slots);
        session.date = Some(date);
        session.slot_options = slots;
        session.step = BookingStep::Time;
        Ok(vec![prompt])
    }

    fn select_time(
        session: &mut BookingSession,
        time: String,
    ) -> Result<Vec<BotReply>, ChatError> {
        session.time = Some(time);
        session.step = BookingStep::Confirmation;
        let (specialty, doctor, date, time) = Self::selections(session)?;
        Ok(vec![reply::confirmation_summary(
            &specialty,
            &doctor.name,
            &date,
            &time,
        )])
    }

    /// Create the appointment and reset the session either way.
    ///
    /// The create call is awaited before the reset, so its outcome (success,
    /// store failure, or the sign-in prompt) is always surfaced to the user.
    async fn confirm(&self, session: &mut BookingSession) -> Result<Vec<BotReply>, ChatError> {
        let (specialty, doctor, date, time) = Self::selections(session)?;

        let outcome = self
            .service
            .create_appointment(BookingRequest {
                specialty,
                doctor_id: doctor.id,
                doctor_name: doctor.name,
                date,
                time,
                source: AppointmentSource::Chatbot,
            })
            .await;

        session.reset();

        let reply = match (&outcome.appointment_id, outcome.success) {
            (Some(id), true) => reply::booked(id),
            _ => BotReply::text(outcome.message),
        };
        Ok(vec![reply])
    }

    /// Snapshot the four selections required at confirmation.
    fn selections(
        session: &BookingSession,
    ) -> Result<(String, DoctorRef, String, String), ChatError> {
        let specialty = session
            .specialty
            .clone()
            .ok_or_else(|| ChatError::Session("missing specialty selection".to_string()))?;
        let doctor = session
            .doctor
            .clone()
            .ok_or_else(|| ChatError::Session("missing doctor selection".to_string()))?;
        let date = session
            .date
            .clone()
            .ok_or_else(|| ChatError::Session("missing date selection".to_string()))?;
        let time = session
            .time
            .clone()
            .ok_or_else(|| ChatError::Session("missing time selection".to_string()))?;
        Ok((specialty, doctor, date, time))
    }

    /// Re-present the current step's options, unchanged.
    fn retry_current_step(session: &BookingSession) -> BotReply {
        match session.step {
            BookingStep::Specialty => reply::specialty_retry(&session.specialty_options),
            BookingStep::Doctor => reply::doctor_retry(&session.doctor_options),
            BookingStep::Time => reply::slot_retry(&session.slot_options),
            _ => reply::fallback(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
