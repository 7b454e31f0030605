//! Conversational appointment booking for HealthConnect.
//!
//! Drives the linear booking conversation (specialty -> doctor -> date ->
//! time -> confirmation) over the appointment access layer: free-text
//! intent detection, per-step validation against the presented options,
//! and error recovery that always degrades to a chat message and a safe
//! state.

pub mod controller;
pub mod error;
pub mod intent;
pub mod matcher;
pub mod reply;
pub mod session;
pub mod transition;

pub use controller::BookingController;
pub use error::ChatError;
pub use matcher::{Match, OptionSet};
pub use reply::BotReply;
pub use session::{BookingSession, BookingStep};
pub use transition::{decide, StepDecision};
