//! Demo seed data.
//!
//! Populates an empty store with the demo specialty/doctor directory and a
//! default working schedule, so the booking flow has something to offer out
//! of the box.

use chrono::{Days, Utc};
use serde_json::json;
use tracing::info;

use healthconnect_core::error::HealthConnectError;

use crate::document::collections::{DOCTORS, DOCTOR_SCHEDULES, SPECIALTIES};
use crate::document::DocumentStore;

/// Demo directory: each specialty with its registered doctors.
const DIRECTORY: &[(&str, &[(&str, &str)])] = &[
    ("Cardiology", &[("doc1", "Dr. Smith"), ("doc2", "Dr. Johnson")]),
    ("Dermatology", &[("doc3", "Dr. Williams"), ("doc4", "Dr. Davis")]),
    ("Neurology", &[("doc5", "Dr. Brown"), ("doc6", "Dr. Miller")]),
    ("Orthopedics", &[("doc7", "Dr. Wilson"), ("doc8", "Dr. Moore")]),
    ("Pediatrics", &[("doc9", "Dr. Taylor"), ("doc10", "Dr. Anderson")]),
    ("Psychiatry", &[("doc11", "Dr. Thomas"), ("doc12", "Dr. Jackson")]),
];

/// Days of schedule to seed ahead of today.
const SCHEDULE_DAYS: u64 = 14;

/// Seed the demo directory and schedules if the store is empty.
///
/// A store that already has specialties is left untouched.
pub async fn seed_demo_data(store: &dyn DocumentStore) -> Result<(), HealthConnectError> {
    if !store.find_eq(SPECIALTIES, &[]).await?.is_empty() {
        return Ok(());
    }

    for (specialty, doctors) in DIRECTORY {
        let specialty_id = specialty.to_lowercase();
        store
            .put(SPECIALTIES, &specialty_id, json!({ "name": specialty }))
            .await?;

        for (id, name) in *doctors {
            store
                .put(
                    DOCTORS,
                    id,
                    json!({ "id": id, "name": name, "specialty": specialty }),
                )
                .await?;
        }
    }

    seed_schedules(store).await?;

    info!(
        specialties = DIRECTORY.len(),
        schedule_days = SCHEDULE_DAYS,
        "Seeded demo directory"
    );
    Ok(())
}

/// Give every doctor a 09:00-17:00 window for the next [`SCHEDULE_DAYS`] days.
async fn seed_schedules(store: &dyn DocumentStore) -> Result<(), HealthConnectError> {
    let today = Utc::now().date_naive();
    let created_at = Utc::now();

    for (_, doctors) in DIRECTORY {
        for (doctor_id, _) in *doctors {
            for offset in 0..SCHEDULE_DAYS {
                let date = today
                    .checked_add_days(Days::new(offset))
                    .ok_or_else(|| HealthConnectError::Storage("date overflow".to_string()))?;
                let doc_id = format!("{}-{}", doctor_id, date);
                store
                    .put(
                        DOCTOR_SCHEDULES,
                        &doc_id,
                        json!({
                            "doctorId": doctor_id,
                            "date": date.format("%Y-%m-%d").to_string(),
                            "day": date.format("%A").to_string(),
                            "startTime": "09:00",
                            "endTime": "17:00",
                            "status": "available",
                            "createdAt": created_at,
                        }),
                    )
                    .await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_seed_populates_directory() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await.unwrap();

        let specialties = store.find_eq(SPECIALTIES, &[]).await.unwrap();
        assert_eq!(specialties.len(), 6);

        let cardiologists = store
            .find_eq(DOCTORS, &[("specialty", json!("Cardiology"))])
            .await
            .unwrap();
        assert_eq!(cardiologists.len(), 2);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await.unwrap();
        seed_demo_data(&store).await.unwrap();
        assert_eq!(store.find_eq(SPECIALTIES, &[]).await.unwrap().len(), 6);
        assert_eq!(store.find_eq(DOCTORS, &[]).await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let store = MemoryStore::new();
        store
            .put(SPECIALTIES, "oncology", json!({"name": "Oncology"}))
            .await
            .unwrap();
        seed_demo_data(&store).await.unwrap();
        // Untouched: only the pre-existing specialty remains.
        assert_eq!(store.find_eq(SPECIALTIES, &[]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_creates_schedule_for_today() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await.unwrap();

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let slots = store
            .find_eq(
                DOCTOR_SCHEDULES,
                &[("doctorId", json!("doc1")), ("date", json!(today))],
            )
            .await
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].body["startTime"], json!("09:00"));
        assert_eq!(slots[0].body["status"], json!("available"));
    }
}
