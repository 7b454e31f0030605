//! Free-text intent detection outside an active booking.
//!
//! Checked in order: booking intent first, then the canned keyword replies.
//! All checks are case-insensitive substring tests over the raw input.

/// True when free text signals intent to start booking: it mentions booking
/// plus either an appointment or a doctor.
pub fn is_booking_request(input: &str) -> bool {
    let lower = input.to_lowercase();
    lower.contains("book") && (lower.contains("appointment") || lower.contains("doctor"))
}

/// Canned reply for recognized out-of-session keywords.
///
/// Returns `None` when nothing matched; the controller falls back to a
/// generic reply.
pub fn keyword_reply(input: &str) -> Option<&'static str> {
    let lower = input.to_lowercase();

    if lower.contains("appointment") || lower.contains("book") {
        Some(
            "You can book an appointment right here. Just say \"book an appointment\" \
             and I'll guide you through the process.",
        )
    } else if lower.contains("doctor") || lower.contains("specialist") {
        Some(
            "We have various specialists available. Say \"book an appointment\" to see \
             every specialty and its doctors.",
        )
    } else if lower.contains("record") || lower.contains("medical history") {
        Some(
            "Your medical records can be found in the 'Medical Records' tab. Is there \
             something specific you're looking for?",
        )
    } else if lower.contains("prescription") || lower.contains("medicine") {
        Some(
            "You can view your prescriptions in the 'Medical Records' section. Would \
             you like me to help you find something specific?",
        )
    } else if lower.contains("hello") || lower.contains("hi") {
        Some("Hello! How can I assist with your healthcare needs today?")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Booking intent ----

    #[test]
    fn test_book_appointment_is_booking() {
        assert!(is_booking_request("I want to book an appointment"));
    }

    #[test]
    fn test_book_doctor_is_booking() {
        assert!(is_booking_request("book me a doctor visit"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_booking_request("BOOK AN APPOINTMENT"));
        assert!(is_booking_request("Book A Doctor"));
    }

    #[test]
    fn test_booking_verb_alone_is_not_booking() {
        assert!(!is_booking_request("I read a good book"));
    }

    #[test]
    fn test_appointment_alone_is_not_booking() {
        assert!(!is_booking_request("when is my appointment"));
    }

    #[test]
    fn test_doctor_alone_is_not_booking() {
        assert!(!is_booking_request("who is my doctor"));
    }

    #[test]
    fn test_empty_is_not_booking() {
        assert!(!is_booking_request(""));
    }

    // ---- Keyword replies, in priority order ----

    #[test]
    fn test_appointment_keyword_reply() {
        let reply = keyword_reply("tell me about appointments").unwrap();
        assert!(reply.contains("book an appointment"));
    }

    #[test]
    fn test_doctor_keyword_reply() {
        let reply = keyword_reply("what specialists do you have").unwrap();
        assert!(reply.contains("specialists"));
    }

    #[test]
    fn test_records_keyword_reply() {
        let reply = keyword_reply("where are my records").unwrap();
        assert!(reply.contains("Medical Records"));
    }

    #[test]
    fn test_prescription_keyword_reply() {
        let reply = keyword_reply("I need my prescription").unwrap();
        assert!(reply.contains("prescriptions"));
    }

    #[test]
    fn test_greeting_reply() {
        let reply = keyword_reply("hello there").unwrap();
        assert!(reply.starts_with("Hello"));
    }

    #[test]
    fn test_appointment_beats_doctor() {
        // "appointment" is checked before "doctor".
        let reply = keyword_reply("appointment with a doctor").unwrap();
        assert!(reply.contains("book an appointment"));
    }

    #[test]
    fn test_unmatched_returns_none() {
        assert!(keyword_reply("what's the weather").is_none());
    }
}
