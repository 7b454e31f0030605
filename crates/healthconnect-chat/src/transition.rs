//! Pure per-state dispatch for the booking conversation.
//!
//! [`decide`] inspects the session and one turn of input and names the next
//! move; it performs no I/O and mutates nothing. The controller owns the
//! side effects (fetches, persistence, replies) each decision implies.

use std::sync::LazyLock;

use regex::Regex;

use healthconnect_core::types::DoctorRef;

use crate::intent::is_booking_request;
use crate::matcher::{Match, OptionSet};
use crate::session::{BookingSession, BookingStep};

/// Date input must be a full `YYYY-MM-DD` literal.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

/// What the controller should do with one turn of input.
#[derive(Clone, Debug, PartialEq)]
pub enum StepDecision {
    /// Begin a new booking conversation.
    StartBooking,
    /// Out-of-session chit-chat; reply and stay idle.
    SmallTalk,
    /// Specialty matched; carries the canonical label.
    SelectSpecialty(String),
    /// Doctor matched; carries the canonical reference.
    SelectDoctor(DoctorRef),
    /// Date input is well-formed.
    SelectDate(String),
    /// Time slot matched; carries the canonical label.
    SelectTime(String),
    /// Affirmative confirmation: create the appointment.
    Confirm,
    /// Negative confirmation: discard the booking.
    Cancel,
    /// Unrecognized confirmation input; ask yes/no again.
    RetryConfirmation,
    /// Selection matched none of the presented options.
    NotRecognized,
    /// Date input did not match `YYYY-MM-DD`.
    InvalidDate,
}

/// Decide the next move for one turn of input.
pub fn decide(session: &BookingSession, input: &str) -> StepDecision {
    if !session.active {
        return if is_booking_request(input) {
            StepDecision::StartBooking
        } else {
            StepDecision::SmallTalk
        };
    }

    match session.step {
        BookingStep::Idle => {
            // Active but idle should not happen; treat like a fresh message.
            if is_booking_request(input) {
                StepDecision::StartBooking
            } else {
                StepDecision::SmallTalk
            }
        }
        BookingStep::Specialty => {
            match OptionSet::from_labels(&session.specialty_options).find(input) {
                Match::Found(specialty) => StepDecision::SelectSpecialty(specialty),
                Match::NotFound => StepDecision::NotRecognized,
            }
        }
        BookingStep::Doctor => {
            let set = OptionSet::new(
                session
                    .doctor_options
                    .iter()
                    .map(|d| (d.name.clone(), d.clone())),
            );
            match set.find(input) {
                Match::Found(doctor) => StepDecision::SelectDoctor(doctor),
                Match::NotFound => StepDecision::NotRecognized,
            }
        }
        BookingStep::Date => {
            let trimmed = input.trim();
            if DATE_RE.is_match(trimmed) {
                StepDecision::SelectDate(trimmed.to_string())
            } else {
                StepDecision::InvalidDate
            }
        }
        BookingStep::Time => match OptionSet::from_labels(&session.slot_options).find(input) {
            Match::Found(slot) => StepDecision::SelectTime(slot),
            Match::NotFound => StepDecision::NotRecognized,
        },
        BookingStep::Confirmation => {
            if is_yes(input) {
                StepDecision::Confirm
            } else if is_no(input) {
                StepDecision::Cancel
            } else {
                StepDecision::RetryConfirmation
            }
        }
    }
}

/// Affirmative confirmation token.
fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Negative confirmation token.
fn is_no(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "no" | "n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: &str, name: &str) -> DoctorRef {
        DoctorRef {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn session_at(step: BookingStep) -> BookingSession {
        let mut session = BookingSession::new();
        session.active = true;
        session.step = step;
        session
    }

    fn specialty_session() -> BookingSession {
        let mut session = session_at(BookingStep::Specialty);
        session.specialty_options = vec![
            "Cardiology".to_string(),
            "Neurology".to_string(),
            "Gastroenterology".to_string(),
        ];
        session
    }

    fn doctor_session() -> BookingSession {
        let mut session = session_at(BookingStep::Doctor);
        session.doctor_options = vec![doctor("doc1", "Dr. Smith"), doctor("doc2", "Dr. Johnson")];
        session
    }

    fn time_session() -> BookingSession {
        let mut session = session_at(BookingStep::Time);
        session.slot_options = vec!["9:00 AM".to_string(), "10:00 AM".to_string()];
        session
    }

    // ---- Idle ----

    #[test]
    fn test_idle_booking_intent_starts() {
        let session = BookingSession::new();
        assert_eq!(
            decide(&session, "I'd like to book an appointment"),
            StepDecision::StartBooking
        );
    }

    #[test]
    fn test_idle_other_input_is_small_talk() {
        let session = BookingSession::new();
        assert_eq!(decide(&session, "hello"), StepDecision::SmallTalk);
    }

    // ---- Specialty ----

    #[test]
    fn test_specialty_exact_match() {
        assert_eq!(
            decide(&specialty_session(), "Cardiology"),
            StepDecision::SelectSpecialty("Cardiology".to_string())
        );
    }

    #[test]
    fn test_specialty_case_insensitive() {
        assert_eq!(
            decide(&specialty_session(), "neurology"),
            StepDecision::SelectSpecialty("Neurology".to_string())
        );
    }

    #[test]
    fn test_specialty_substring_does_not_match() {
        // "Neurology" must not be found inside "Gastroenterology".
        assert_eq!(
            decide(&specialty_session(), "enterology"),
            StepDecision::NotRecognized
        );
    }

    #[test]
    fn test_specialty_unknown_not_recognized() {
        assert_eq!(
            decide(&specialty_session(), "Oncology"),
            StepDecision::NotRecognized
        );
    }

    // ---- Doctor ----

    #[test]
    fn test_doctor_match_carries_identifier() {
        assert_eq!(
            decide(&doctor_session(), "dr. smith"),
            StepDecision::SelectDoctor(doctor("doc1", "Dr. Smith"))
        );
    }

    #[test]
    fn test_doctor_unknown_not_recognized() {
        assert_eq!(
            decide(&doctor_session(), "Dr. Who"),
            StepDecision::NotRecognized
        );
    }

    // ---- Date ----

    #[test]
    fn test_date_well_formed() {
        assert_eq!(
            decide(&session_at(BookingStep::Date), "2025-03-10"),
            StepDecision::SelectDate("2025-03-10".to_string())
        );
    }

    #[test]
    fn test_date_trims_whitespace() {
        assert_eq!(
            decide(&session_at(BookingStep::Date), "  2025-03-10  "),
            StepDecision::SelectDate("2025-03-10".to_string())
        );
    }

    #[test]
    fn test_date_malformed_variants() {
        let session = session_at(BookingStep::Date);
        for input in [
            "03/10/2025",
            "2025-3-10",
            "March 10",
            "tomorrow",
            "2025-03-10 please",
            "",
        ] {
            assert_eq!(
                decide(&session, input),
                StepDecision::InvalidDate,
                "input: {:?}",
                input
            );
        }
    }

    // ---- Time ----

    #[test]
    fn test_time_match() {
        assert_eq!(
            decide(&time_session(), "10:00 am"),
            StepDecision::SelectTime("10:00 AM".to_string())
        );
    }

    #[test]
    fn test_time_unknown_not_recognized() {
        assert_eq!(
            decide(&time_session(), "8:00 PM"),
            StepDecision::NotRecognized
        );
    }

    // ---- Confirmation ----

    #[test]
    fn test_confirmation_yes_tokens() {
        let session = session_at(BookingStep::Confirmation);
        for input in ["yes", "Yes", "YES", "y", " Y "] {
            assert_eq!(decide(&session, input), StepDecision::Confirm, "{:?}", input);
        }
    }

    #[test]
    fn test_confirmation_no_tokens() {
        let session = session_at(BookingStep::Confirmation);
        for input in ["no", "No", "NO", "n", " N "] {
            assert_eq!(decide(&session, input), StepDecision::Cancel, "{:?}", input);
        }
    }

    #[test]
    fn test_confirmation_other_retries() {
        let session = session_at(BookingStep::Confirmation);
        for input in ["maybe", "yep", "nope", "sure", ""] {
            assert_eq!(
                decide(&session, input),
                StepDecision::RetryConfirmation,
                "{:?}",
                input
            );
        }
    }

    // ---- Purity ----

    #[test]
    fn test_decide_does_not_mutate_session() {
        let session = specialty_session();
        let before = format!("{:?}", session);
        let _ = decide(&session, "Cardiology");
        let _ = decide(&session, "garbage");
        assert_eq!(format!("{:?}", session), before);
    }
}
