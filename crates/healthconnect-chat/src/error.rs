//! Error types for the booking conversation.

/// Errors from the dialogue controller.
///
/// Domain-level failures (backend errors, bad selections) never surface
/// here; they become chat replies. These variants are caller mistakes.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session state error: {0}")]
    Session(String),
}
