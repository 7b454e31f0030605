//! Assistant replies.
//!
//! A [`BotReply`] carries the message text plus any option labels the
//! presentation surface renders as buttons. The builders below keep the
//! assistant's voice in one place.

use serde::{Deserialize, Serialize};

use healthconnect_core::types::DoctorRef;

/// A single message from the assistant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotReply {
    pub text: String,
    /// Option labels to render as buttons, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl BotReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

fn doctor_names(doctors: &[DoctorRef]) -> Vec<String> {
    doctors.iter().map(|d| d.name.clone()).collect()
}

pub(crate) fn specialty_prompt(specialties: &[String]) -> BotReply {
    BotReply::with_options(
        "I can help you book an appointment. Which specialty are you looking for?",
        specialties.to_vec(),
    )
}

pub(crate) fn specialty_retry(specialties: &[String]) -> BotReply {
    BotReply::with_options(
        "Sorry, I didn't recognize that specialty. Please choose one of these:",
        specialties.to_vec(),
    )
}

pub(crate) fn doctor_prompt(specialty: &str, doctors: &[DoctorRef]) -> BotReply {
    BotReply::with_options(
        format!("Here are our {} doctors. Who would you like to see?", specialty),
        doctor_names(doctors),
    )
}

pub(crate) fn doctor_retry(doctors: &[DoctorRef]) -> BotReply {
    BotReply::with_options(
        "Sorry, I didn't recognize that doctor. Please choose one of these:",
        doctor_names(doctors),
    )
}

pub(crate) fn no_doctors(specialty: &str) -> BotReply {
    BotReply::text(format!(
        "There are no {} doctors registered right now. Please choose a different specialty.",
        specialty
    ))
}

pub(crate) fn date_prompt(doctor_name: &str) -> BotReply {
    BotReply::text(format!(
        "{} it is. What date would you like? Please enter it as YYYY-MM-DD.",
        doctor_name
    ))
}

pub(crate) fn date_retry() -> BotReply {
    BotReply::text("Please enter the date in YYYY-MM-DD format, e.g. 2025-03-10.")
}

pub(crate) fn no_slots(date: &str) -> BotReply {
    BotReply::text(format!(
        "There are no available time slots on {}. Please enter a different date (YYYY-MM-DD).",
        date
    ))
}

pub(crate) fn slot_prompt(date: &str, slots: &[String]) -> BotReply {
    BotReply::with_options(
        format!("Here are the available time slots on {}:", date),
        slots.to_vec(),
    )
}

pub(crate) fn slot_retry(slots: &[String]) -> BotReply {
    BotReply::with_options(
        "Sorry, that time isn't available. Please choose one of these slots:",
        slots.to_vec(),
    )
}

pub(crate) fn confirmation_summary(
    specialty: &str,
    doctor_name: &str,
    date: &str,
    time: &str,
) -> BotReply {
    BotReply::with_options(
        format!(
            "Here's your appointment: {} with {} on {} at {}. Shall I book it?",
            specialty, doctor_name, date, time
        ),
        vec!["Yes".to_string(), "No".to_string()],
    )
}

pub(crate) fn confirmation_retry() -> BotReply {
    BotReply::with_options(
        "Sorry, I need a yes or no. Should I book this appointment?",
        vec!["Yes".to_string(), "No".to_string()],
    )
}

pub(crate) fn booked(appointment_id: &str) -> BotReply {
    BotReply::text(format!(
        "Your appointment has been booked! Your appointment ID is {}. \
         You can view it under 'My Appointments'.",
        appointment_id
    ))
}

pub(crate) fn cancelled() -> BotReply {
    BotReply::text("No problem, I've cancelled that request. Is there anything else I can help with?")
}

pub(crate) fn fetch_failed() -> BotReply {
    BotReply::text(
        "Sorry, I'm having trouble reaching our scheduling system. Please try again in a moment.",
    )
}

pub(crate) fn booking_unavailable() -> BotReply {
    BotReply::text(
        "Sorry, online booking isn't available right now. Please try again later.",
    )
}

pub(crate) fn busy() -> BotReply {
    BotReply::text("One moment, I'm still working on your last message.")
}

pub(crate) fn fallback() -> BotReply {
    BotReply::text(
        "Thank you for your message. How else can I help you with your healthcare needs today?",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_reply_has_no_options() {
        let reply = BotReply::text("hello");
        assert_eq!(reply.text, "hello");
        assert!(reply.options.is_empty());
    }

    #[test]
    fn test_specialty_prompt_carries_options() {
        let reply = specialty_prompt(&["Cardiology".to_string(), "Neurology".to_string()]);
        assert_eq!(reply.options.len(), 2);
        assert!(reply.text.contains("specialty"));
    }

    #[test]
    fn test_doctor_prompt_lists_names() {
        let doctors = vec![
            DoctorRef {
                id: "doc1".to_string(),
                name: "Dr. Smith".to_string(),
            },
            DoctorRef {
                id: "doc2".to_string(),
                name: "Dr. Johnson".to_string(),
            },
        ];
        let reply = doctor_prompt("Cardiology", &doctors);
        assert_eq!(reply.options, vec!["Dr. Smith", "Dr. Johnson"]);
        assert!(reply.text.contains("Cardiology"));
    }

    #[test]
    fn test_confirmation_summary_mentions_all_fields() {
        let reply = confirmation_summary("Cardiology", "Dr. Smith", "2025-03-10", "10:00 AM");
        assert!(reply.text.contains("Cardiology"));
        assert!(reply.text.contains("Dr. Smith"));
        assert!(reply.text.contains("2025-03-10"));
        assert!(reply.text.contains("10:00 AM"));
        assert_eq!(reply.options, vec!["Yes", "No"]);
    }

    #[test]
    fn test_booked_mentions_id() {
        assert!(booked("APT1234").text.contains("APT1234"));
    }

    #[test]
    fn test_serialization_skips_empty_options() {
        let json = serde_json::to_string(&BotReply::text("hi")).unwrap();
        assert!(!json.contains("options"));

        let json =
            serde_json::to_string(&BotReply::with_options("hi", vec!["a".to_string()])).unwrap();
        assert!(json.contains("options"));
    }
}
