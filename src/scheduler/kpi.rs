//! Schedule quality metrics (KPIs).
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Utilization | scheduled / max_capacity |
//! | Panel load | Interviews per panel |
//! | Day load | Interviews per day |
//! | Days used | Days with at least one interview |
//! | Last end | Latest interview end |

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::CapacityPlan;
use crate::models::SlotAssignment;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Number of interviews scheduled.
    pub scheduled_count: usize,
    /// Capacity of the drive.
    pub max_capacity: usize,
    /// Fraction of capacity in use (0.0..=1.0).
    pub utilization: f64,
    /// Interviews per panel index.
    pub load_by_panel: BTreeMap<u32, usize>,
    /// Interviews per day.
    pub load_by_date: BTreeMap<NaiveDate, usize>,
    /// Days with at least one interview.
    pub days_used: usize,
    /// Latest interview end.
    pub last_end_time: Option<NaiveDateTime>,
}

impl ScheduleKpi {
    /// Computes KPIs for a set of assignments against its capacity plan.
    pub fn calculate(assignments: &[SlotAssignment], plan: &CapacityPlan) -> Self {
        let mut load_by_panel = BTreeMap::new();
        let mut load_by_date = BTreeMap::new();
        for a in assignments {
            *load_by_panel.entry(a.panel).or_insert(0) += 1;
            *load_by_date.entry(a.date()).or_insert(0) += 1;
        }

        let max_capacity = plan.capacity();
        let utilization = if max_capacity == 0 {
            0.0
        } else {
            assignments.len() as f64 / max_capacity as f64
        };

        Self {
            scheduled_count: assignments.len(),
            max_capacity,
            utilization,
            days_used: load_by_date.len(),
            load_by_panel,
            load_by_date,
            last_end_time: assignments.iter().map(|a| a.end_time).max(),
        }
    }

    /// Whether utilization reaches `min_utilization`.
    pub fn meets_utilization(&self, min_utilization: f64) -> bool {
        self.utilization >= min_utilization
    }

    /// Largest difference in load between any two used panels.
    pub fn panel_imbalance(&self) -> usize {
        let max = self.load_by_panel.values().max().copied().unwrap_or(0);
        let min = self.load_by_panel.values().min().copied().unwrap_or(0);
        max - min
    }
}
