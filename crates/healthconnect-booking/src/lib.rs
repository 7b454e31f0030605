//! Appointment access layer for HealthConnect.
//!
//! The façade between the booking conversation (and any other surface) and
//! the document store: directory lookups, slot computation, appointment
//! creation and lifecycle, and the doctor schedule write path. Identity is
//! resolved per call through the [`IdentityProvider`] seam.

pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod schedule;
pub mod service;

pub use error::BookingError;
pub use identity::{AnonymousProvider, FixedIdentityProvider, IdentityProvider};
pub use schedule::{slot_labels, ScheduleService};
pub use service::{sort_appointments, AppointmentService, BookingOutcome, BookingRequest};
