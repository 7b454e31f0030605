use thiserror::Error;

/// Top-level error type for the HealthConnect system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for HealthConnectError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HealthConnectError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Booking error: {0}")]
    Booking(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HealthConnectError {
    fn from(err: toml::de::Error) -> Self {
        HealthConnectError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HealthConnectError {
    fn from(err: toml::ser::Error) -> Self {
        HealthConnectError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HealthConnectError {
    fn from(err: serde_json::Error) -> Self {
        HealthConnectError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for HealthConnect operations.
pub type Result<T> = std::result::Result<T, HealthConnectError>;
