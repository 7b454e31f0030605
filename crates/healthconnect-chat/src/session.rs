//! Booking session state.
//!
//! A [`BookingSession`] is the transient state of one conversation. It is
//! owned by the caller, constructed fresh per conversation, and passed into
//! the controller for every turn; the controller is the only mutator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use healthconnect_core::types::DoctorRef;

/// Current position in the booking conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    /// No booking in progress.
    #[default]
    Idle,
    /// Choosing a specialty from the presented list.
    Specialty,
    /// Choosing a doctor within the chosen specialty.
    Doctor,
    /// Entering a calendar date.
    Date,
    /// Choosing a time slot for (doctor, date).
    Time,
    /// Reviewing the summary, answering yes/no.
    Confirmation,
}

/// Transient state of one booking conversation.
///
/// Selections fill strictly in step order: `doctor` only after `specialty`,
/// `time` only after `date`, and all four before the confirmation step.
/// The presented option sets are kept on the session so selection matching
/// needs no re-fetch and retries re-present them unchanged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingSession {
    pub id: Uuid,
    pub step: BookingStep,
    pub specialty: Option<String>,
    pub doctor: Option<DoctorRef>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub specialty_options: Vec<String>,
    pub doctor_options: Vec<DoctorRef>,
    pub slot_options: Vec<String>,
    /// True from booking-intent detection until completion or cancellation.
    pub active: bool,
    /// True while a turn is being processed; further input is refused.
    pub loading: bool,
    /// Monotonic turn counter, bumped at the start of every processed turn.
    turn: u64,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl BookingSession {
    /// Create a fresh idle session.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: BookingStep::Idle,
            specialty: None,
            doctor: None,
            date: None,
            time: None,
            specialty_options: Vec::new(),
            doctor_options: Vec::new(),
            slot_options: Vec::new(),
            active: false,
            loading: false,
            turn: 0,
            started_at: now,
            last_message_at: now,
        }
    }

    /// Return every selection and option set to its initial empty state.
    ///
    /// The session object stays usable: a later booking-intent signal starts
    /// a fresh conversation unaffected by this one.
    pub fn reset(&mut self) {
        self.step = BookingStep::Idle;
        self.specialty = None;
        self.doctor = None;
        self.date = None;
        self.time = None;
        self.specialty_options.clear();
        self.doctor_options.clear();
        self.slot_options.clear();
        self.active = false;
    }

    /// Mark the start of a processed turn and return its token.
    pub(crate) fn begin_turn(&mut self) -> u64 {
        self.turn += 1;
        self.loading = true;
        self.turn
    }

    /// Mark the end of a processed turn.
    pub(crate) fn end_turn(&mut self) {
        self.loading = false;
    }

    /// The token of the most recently started turn.
    pub fn turn_token(&self) -> u64 {
        self.turn
    }

    /// All four selections are present, as required at confirmation.
    pub fn selections_complete(&self) -> bool {
        self.specialty.is_some() && self.doctor.is_some() && self.date.is_some() && self.time.is_some()
    }
}

impl Default for BookingSession {
    fn default() -> Self {
        Self::new()
    }
}
