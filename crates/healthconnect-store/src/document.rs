//! The document store abstraction.
//!
//! Captures exactly what the application consumes from the hosted document
//! database: single-document create/overwrite, lookup by id, and queries
//! that are a conjunction of exact field-equality filters. No range scans,
//! no ordering guarantees.

use async_trait::async_trait;
use serde_json::Value;

use healthconnect_core::error::HealthConnectError;

/// Collection names used by the application.
pub mod collections {
    pub const SPECIALTIES: &str = "specialties";
    pub const DOCTORS: &str = "doctors";
    pub const APPOINTMENTS: &str = "appointments";
    pub const DOCTOR_SCHEDULES: &str = "doctorSchedules";
}

/// A stored document together with its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

/// Document-oriented storage surface.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or overwrite the document with the given id.
    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), HealthConnectError>;

    /// Fetch a single document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, HealthConnectError>;

    /// All documents whose top-level fields equal every `(field, value)`
    /// filter. An empty filter list returns the whole collection.
    async fn find_eq(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Document>, HealthConnectError>;

    /// Remove a document by id. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), HealthConnectError>;
}
