//! Doctor schedule write path and slot computation.
//!
//! Schedules are one working window per (doctor, date); submitting a new
//! window replaces the old one rather than appending. Bookable time labels
//! are the hourly marks covered by the window.

use std::sync::Arc;

use chrono::{NaiveTime, Timelike};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use healthconnect_core::types::{ScheduleSlot, SlotStatus};
use healthconnect_store::collections::DOCTOR_SCHEDULES;
use healthconnect_store::DocumentStore;

use crate::error::BookingError;

/// Write-side service for doctor schedules.
pub struct ScheduleService {
    store: Arc<dyn DocumentStore>,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create or replace the schedule window for (doctor, date).
    ///
    /// Rejects blank fields, equal start/end times, and windows that end
    /// before they start. Any existing documents for the same (doctor, date)
    /// are removed first, so at most one survives. Returns the new document
    /// id.
    pub async fn upsert_slot(&self, slot: &ScheduleSlot) -> Result<String, BookingError> {
        if slot.doctor_id.trim().is_empty()
            || slot.date.trim().is_empty()
            || slot.day.trim().is_empty()
            || slot.start_time.trim().is_empty()
            || slot.end_time.trim().is_empty()
        {
            return Err(BookingError::InvalidSchedule(
                "missing required fields".to_string(),
            ));
        }
        if slot.start_time == slot.end_time {
            return Err(BookingError::InvalidSchedule(
                "start time and end time cannot be the same".to_string(),
            ));
        }
        if slot.start_time > slot.end_time {
            return Err(BookingError::InvalidSchedule(
                "end time must be after start time".to_string(),
            ));
        }

        let existing = self
            .store
            .find_eq(
                DOCTOR_SCHEDULES,
                &[
                    ("doctorId", json!(slot.doctor_id)),
                    ("date", json!(slot.date)),
                ],
            )
            .await?;
        for doc in existing {
            self.store.delete(DOCTOR_SCHEDULES, &doc.id).await?;
        }

        let id = Uuid::new_v4().to_string();
        self.store
            .put(DOCTOR_SCHEDULES, &id, serde_json::to_value(slot)?)
            .await?;
        Ok(id)
    }

    /// All schedule windows registered for a doctor.
    pub async fn list_for_doctor(
        &self,
        doctor_id: &str,
    ) -> Result<Vec<ScheduleSlot>, BookingError> {
        let docs = self
            .store
            .find_eq(DOCTOR_SCHEDULES, &[("doctorId", json!(doctor_id))])
            .await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value(doc.body) {
                Ok(slot) => Some(slot),
                Err(e) => {
                    warn!(id = %doc.id, error = %e, "Skipping malformed schedule document");
                    None
                }
            })
            .collect())
    }
}

/// Hourly time labels covered by a schedule window, oldest first.
///
/// An unavailable window, or one with unparseable times, yields no labels.
pub fn slot_labels(slot: &ScheduleSlot) -> Vec<String> {
    if slot.status != SlotStatus::Available {
        return vec![];
    }

    let (Some(start), Some(end)) = (
        minutes_of_day(&slot.start_time),
        minutes_of_day(&slot.end_time),
    ) else {
        return vec![];
    };

    let mut labels = Vec::new();
    let mut minute = start;
    while minute < end {
        if let Some(t) = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0) {
            labels.push(t.format("%-I:%M %p").to_string());
        }
        minute += 60;
    }
    labels
}

/// Parse a 24-hour `HH:MM` string into minutes since midnight.
fn minutes_of_day(s: &str) -> Option<u32> {
    let t = NaiveTime::parse_from_str(s, "%H:%M").ok()?;
    Some(t.hour() * 60 + t.minute())
}
