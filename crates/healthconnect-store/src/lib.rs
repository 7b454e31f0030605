//! HealthConnect store crate - the document database surface.
//!
//! Models the hosted document store the application persists through:
//! single-document create/overwrite and conjunctive exact-field-match
//! queries. Ships an in-memory implementation for tests and demos and a
//! WAL-mode SQLite implementation for local persistence, plus demo seed
//! data for the specialty/doctor directory.

pub mod document;
pub mod memory;
pub mod seed;
pub mod sqlite;

pub use document::{collections, Document, DocumentStore};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
