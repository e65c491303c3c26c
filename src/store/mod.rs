//! Schedule persistence.
//!
//! A store holds exactly one authoritative schedule per drive.
//! [`ScheduleStore::replace`] swaps the whole assignment set in one
//! step: readers see either the previous set or the new one, and
//! concurrent replaces for the same drive serialize so the result is
//! exactly one of them.
//!
//! Two backends are provided:
//! - [`MemoryScheduleStore`]: process-local, for tests and embedding.
//! - [`DurableScheduleStore`]: redb-backed, one write transaction per replace.

mod durable;
mod memory;

pub use durable::DurableScheduleStore;
pub use memory::MemoryScheduleStore;

use crate::error::{StoreError, StoreResult};
use crate::models::{SlotAssignment, StoredSchedule};

/// Persistence for drive schedules.
pub trait ScheduleStore: Send + Sync {
    /// Replaces the drive's schedule with `assignments`.
    ///
    /// Returns the stored schedule with its new generation number.
    fn replace(&self, drive_id: &str, assignments: Vec<SlotAssignment>)
        -> StoreResult<StoredSchedule>;

    /// Returns the drive's current schedule, if one was ever stored.
    fn get(&self, drive_id: &str) -> StoreResult<Option<StoredSchedule>>;

    /// Removes the drive's schedule. Returns true if it existed.
    fn clear(&self, drive_id: &str) -> StoreResult<bool>;

    /// Returns the drive's current assignments (empty if none).
    fn list(&self, drive_id: &str) -> StoreResult<Vec<SlotAssignment>> {
        Ok(self
            .get(drive_id)?
            .map(|schedule| schedule.assignments)
            .unwrap_or_default())
    }
}

/// Rejects assignments that belong to another drive.
pub(crate) fn check_drive(drive_id: &str, assignments: &[SlotAssignment]) -> StoreResult<()> {
    match assignments.iter().find(|a| a.drive_id != drive_id) {
        Some(stray) => Err(StoreError::DriveMismatch {
            assignment_id: stray.id.clone(),
            expected: drive_id.to_string(),
            found: stray.drive_id.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use crate::models::SlotAssignment;

    pub fn assignment(drive_id: &str, candidate: &str, minute_offset: i64) -> SlotAssignment {
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2026, 3, 25)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + Duration::minutes(minute_offset);
        SlotAssignment {
            id: SlotAssignment::composite_id(candidate, start),
            drive_id: drive_id.to_string(),
            candidate_id: candidate.to_string(),
            name: candidate.to_string(),
            email: format!("{candidate}@example.edu"),
            panel: 1,
            panel_label: "Panel 1".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(25),
            date_label: start.format("%b %d, %Y").to_string(),
        }
    }

    pub fn schedule(drive_id: &str, candidates: &[&str]) -> Vec<SlotAssignment> {
        candidates
            .iter()
            .enumerate()
            .map(|(i, c)| assignment(drive_id, c, i as i64 * 30))
            .collect()
    }
}
