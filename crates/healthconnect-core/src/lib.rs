pub mod config;
pub mod error;
pub mod types;

pub use config::HealthConnectConfig;
pub use error::{HealthConnectError, Result};
pub use types::*;
