//! Schedule (solution) model.
//!
//! A schedule is the set of slot assignments for one drive. Each
//! generation replaces the whole set; the stored copy carries a
//! generation counter so readers can tell regenerations apart.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One candidate placed in one (date, start, end, panel) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// Composite ID: `{candidate_id}_{start:%Y-%m-%dT%H:%M}`.
    pub id: String,
    /// Owning drive.
    pub drive_id: String,
    /// Assigned candidate.
    pub candidate_id: String,
    /// Candidate name (denormalized for notification).
    pub name: String,
    /// Candidate email (denormalized for notification).
    pub email: String,
    /// Panel index, 1-based.
    pub panel: u32,
    /// Panel display label, e.g. `Panel 1`.
    pub panel_label: String,
    /// Interview start.
    pub start_time: NaiveDateTime,
    /// Interview end.
    pub end_time: NaiveDateTime,
    /// Display date, e.g. `Mar 25, 2026`.
    pub date_label: String,
}

impl SlotAssignment {
    /// Builds the composite assignment ID.
    pub fn composite_id(candidate_id: &str, start_time: NaiveDateTime) -> String {
        format!("{}_{}", candidate_id, start_time.format("%Y-%m-%dT%H:%M"))
    }

    /// Interview day.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Start time of day.
    #[inline]
    pub fn time(&self) -> NaiveTime {
        self.start_time.time()
    }

    /// Interview length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// The (date, time, panel) tuple that must be unique within a schedule.
    pub fn slot_key(&self) -> (NaiveDate, NaiveTime, u32) {
        (self.date(), self.time(), self.panel)
    }
}

/// The authoritative schedule of a drive as held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSchedule {
    /// Owning drive.
    pub drive_id: String,
    /// Replace counter, starting at 1 and bumped on every replace.
    pub generation: u64,
    /// Assignments in allocation order.
    pub assignments: Vec<SlotAssignment>,
}

impl StoredSchedule {
    /// Creates a stored schedule.
    pub fn new(drive_id: impl Into<String>, generation: u64, assignments: Vec<SlotAssignment>) -> Self {
        Self {
            drive_id: drive_id.into(),
            generation,
            assignments,
        }
    }

    /// Finds the assignment for a given candidate.
    pub fn assignment_for_candidate(&self, candidate_id: &str) -> Option<&SlotAssignment> {
        self.assignments
            .iter()
            .find(|a| a.candidate_id == candidate_id)
    }

    /// Returns all assignments on a given panel.
    pub fn assignments_for_panel(&self, panel: u32) -> Vec<&SlotAssignment> {
        self.assignments.iter().filter(|a| a.panel == panel).collect()
    }

    /// Returns all assignments on a given day.
    pub fn assignments_on(&self, date: NaiveDate) -> Vec<&SlotAssignment> {
        self.assignments.iter().filter(|a| a.date() == date).collect()
    }

    /// Latest interview end, if any.
    pub fn last_end_time(&self) -> Option<NaiveDateTime> {
        self.assignments.iter().map(|a| a.end_time).max()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule has no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
