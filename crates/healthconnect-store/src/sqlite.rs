//! SQLite-backed document store.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access,
//! with WAL mode and recommended PRAGMAs configured on open. Documents live
//! in one `documents(collection, id, body)` table; equality filters are
//! evaluated with `json_extract` over the JSON body.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use tracing::info;

use healthconnect_core::error::HealthConnectError;

use crate::document::{Document, DocumentStore};

/// SQLite [`DocumentStore`] implementation.
///
/// The connection is wrapped in a Mutex since rusqlite Connection is not
/// Sync. WAL mode keeps concurrent reads safe at the OS level.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, HealthConnectError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| HealthConnectError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| HealthConnectError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!("Document database opened at {}", path.display());

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(run_migrations)?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, HealthConnectError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| HealthConnectError::Storage(format!("Failed to open in-memory db: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| HealthConnectError::Storage(format!("Failed to set pragmas: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(run_migrations)?;
        Ok(store)
    }

    /// Execute a closure with a reference to the underlying connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T, HealthConnectError>
    where
        F: FnOnce(&Connection) -> Result<T, HealthConnectError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HealthConnectError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

/// Apply pending schema migrations, tracked via `PRAGMA user_version`.
fn run_migrations(conn: &Connection) -> Result<(), HealthConnectError> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| HealthConnectError::Storage(format!("Failed to read schema version: {}", e)))?;

    if version < 1 {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                 collection TEXT NOT NULL,
                 id         TEXT NOT NULL,
                 body       TEXT NOT NULL,
                 PRIMARY KEY (collection, id)
             );
             CREATE INDEX IF NOT EXISTS idx_documents_collection
                 ON documents(collection);
             PRAGMA user_version = 1;",
        )
        .map_err(|e| HealthConnectError::Storage(format!("Migration failed: {}", e)))?;
        info!("Document schema migrated to version 1");
    }

    Ok(())
}

/// Convert a JSON filter value into a bindable SQL value.
///
/// `json_extract` yields TEXT for JSON strings, INTEGER for integers and
/// booleans, and REAL for floats, so the mapping below compares correctly.
/// Null filters never match (SQL `= NULL` is not true).
fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else {
                SqlValue::Real(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn parse_body(id: &str, body: &str) -> Result<Value, HealthConnectError> {
    serde_json::from_str(body).map_err(|e| {
        HealthConnectError::Storage(format!("Corrupt document body for {}: {}", id, e))
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), HealthConnectError> {
        let body = document.to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
                rusqlite::params![collection, id, body],
            )
            .map_err(|e| HealthConnectError::Storage(format!("Failed to put document: {}", e)))?;
            Ok(())
        })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, HealthConnectError> {
        self.with_conn(|conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    rusqlite::params![collection, id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| HealthConnectError::Storage(e.to_string()))?;

            match body {
                Some(body) => Ok(Some(parse_body(id, &body)?)),
                None => Ok(None),
            }
        })
    }

    async fn find_eq(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Document>, HealthConnectError> {
        let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?");
        let mut params: Vec<SqlValue> = vec![SqlValue::Text(collection.to_string())];
        for (field, value) in filters {
            sql.push_str(" AND json_extract(body, ?) = ?");
            params.push(SqlValue::Text(format!("$.{}", field)));
            params.push(json_to_sql(value));
        }
        sql.push_str(" ORDER BY id");

        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| HealthConnectError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(params_from_iter(params.iter()), |row| {
                    let id: String = row.get(0)?;
                    let body: String = row.get(1)?;
                    Ok((id, body))
                })
                .map_err(|e| HealthConnectError::Storage(e.to_string()))?;

            let mut documents = Vec::new();
            for row in rows {
                let (id, body) = row.map_err(|e| HealthConnectError::Storage(e.to_string()))?;
                let body = parse_body(&id, &body)?;
                documents.push(Document { id, body });
            }
            Ok(documents)
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), HealthConnectError> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                rusqlite::params![collection, id],
            )
            .map_err(|e| HealthConnectError::Storage(format!("Failed to delete document: {}", e)))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::collections::{APPOINTMENTS, DOCTORS};
    use serde_json::json;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .put(DOCTORS, "doc1", json!({"name": "Dr. Smith"}))
            .await
            .unwrap();
        let doc = store.get(DOCTORS, "doc1").await.unwrap();
        assert_eq!(doc, Some(json!({"name": "Dr. Smith"})));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get(DOCTORS, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = SqliteStore::in_memory().unwrap();
        store.put(DOCTORS, "doc1", json!({"v": 1})).await.unwrap();
        store.put(DOCTORS, "doc1", json!({"v": 2})).await.unwrap();
        assert_eq!(
            store.get(DOCTORS, "doc1").await.unwrap(),
            Some(json!({"v": 2}))
        );
        assert_eq!(store.find_eq(DOCTORS, &[]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_eq_string_filter() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .put(DOCTORS, "doc1", json!({"name": "Dr. Smith", "specialty": "Cardiology"}))
            .await
            .unwrap();
        store
            .put(DOCTORS, "doc3", json!({"name": "Dr. Williams", "specialty": "Dermatology"}))
            .await
            .unwrap();

        let found = store
            .find_eq(DOCTORS, &[("specialty", json!("Cardiology"))])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "doc1");
        assert_eq!(found[0].body["name"], json!("Dr. Smith"));
    }

    #[tokio::test]
    async fn test_find_eq_conjunction() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .put(APPOINTMENTS, "a", json!({"doctorId": "doc1", "date": "2025-03-10"}))
            .await
            .unwrap();
        store
            .put(APPOINTMENTS, "b", json!({"doctorId": "doc1", "date": "2025-03-11"}))
            .await
            .unwrap();
        store
            .put(APPOINTMENTS, "c", json!({"doctorId": "doc2", "date": "2025-03-10"}))
            .await
            .unwrap();

        let found = store
            .find_eq(
                APPOINTMENTS,
                &[("doctorId", json!("doc1")), ("date", json!("2025-03-10"))],
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }

    #[tokio::test]
    async fn test_find_eq_integer_filter() {
        let store = SqliteStore::in_memory().unwrap();
        store.put("c", "a", json!({"n": 1})).await.unwrap();
        store.put("c", "b", json!({"n": 2})).await.unwrap();
        let found = store.find_eq("c", &[("n", json!(2))]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b");
    }

    #[tokio::test]
    async fn test_find_eq_no_match_empty() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .put(DOCTORS, "doc1", json!({"specialty": "Cardiology"}))
            .await
            .unwrap();
        let found = store
            .find_eq(DOCTORS, &[("specialty", json!("Oncology"))])
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = SqliteStore::in_memory().unwrap();
        store.put(DOCTORS, "doc1", json!({"n": 1})).await.unwrap();
        store.delete(DOCTORS, "doc1").await.unwrap();
        assert_eq!(store.get(DOCTORS, "doc1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.delete(DOCTORS, "ghost").await.is_ok());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = SqliteStore::in_memory().unwrap();
        store.put("a", "x", json!({"n": 1})).await.unwrap();
        store.put("b", "x", json!({"n": 2})).await.unwrap();
        assert_eq!(store.get("a", "x").await.unwrap(), Some(json!({"n": 1})));
        assert_eq!(store.get("b", "x").await.unwrap(), Some(json!({"n": 2})));
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put(DOCTORS, "doc1", json!({"n": 1})).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get(DOCTORS, "doc1").await.unwrap(), Some(json!({"n": 1})));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_nested_fields_survive_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let body = json!({"outer": {"inner": [1, 2, 3]}, "flag": true});
        store.put("c", "x", body.clone()).await.unwrap();
        assert_eq!(store.get("c", "x").await.unwrap(), Some(body));
    }
}
