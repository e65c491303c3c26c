//! Capacity planning.
//!
//! Turns a drive configuration into the numbers the allocator works
//! with:
//!
//! | Quantity | Definition |
//! |----------|-----------|
//! | `days_count` | `(end_date - start_date).days + 1` |
//! | `daily_minutes` | `daily_end_time - daily_start_time` |
//! | `slot_cycle` | `slot_duration + break_duration` |
//! | `slots_per_day` | `floor(daily_minutes / slot_cycle)` |
//! | `max_capacity` | `slots_per_day * panel_count * days_count` |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ScheduleError, ScheduleResult};
use crate::models::ScheduleConfig;
use crate::validation::{validate_config, ValidationError, ValidationErrorKind};

/// Capacity numbers derived from a [`ScheduleConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPlan {
    /// Interview days in the range.
    pub days_count: i64,
    /// Minutes in the daily window.
    pub daily_minutes: i64,
    /// Minutes between consecutive time-window starts.
    pub slot_cycle: i64,
    /// Time windows per day.
    pub slots_per_day: i64,
    /// Parallel panels per time window.
    pub panel_count: u32,
    /// Total interviews the drive can hold.
    pub max_capacity: i64,
}

impl CapacityPlan {
    /// Total capacity as a count. Zero when the plan is infeasible.
    #[inline]
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_capacity).unwrap_or(0)
    }

    /// Interviews per day across all panels.
    #[inline]
    pub fn daily_capacity(&self) -> i64 {
        self.slots_per_day.saturating_mul(i64::from(self.panel_count))
    }
}

/// Validates `config` and computes its capacity plan.
///
/// # Errors
/// - [`ScheduleError::Config`] if the config fails validation.
/// - [`ScheduleError::Capacity`] if the drive can hold no interviews.
///
/// # Example
///
/// ```
/// use interview_slots::models::ScheduleConfig;
/// use interview_slots::scheduler::plan_capacity;
///
/// let config = ScheduleConfig::parse("d1", "2026-03-25", "2026-03-26", "09:00", "17:00")
///     .unwrap()
///     .with_slot_duration(25)
///     .with_break_duration(5)
///     .with_panels(2);
/// let plan = plan_capacity(&config).unwrap();
/// assert_eq!(plan.slots_per_day, 16);
/// assert_eq!(plan.max_capacity, 64);
/// ```
pub fn plan_capacity(config: &ScheduleConfig) -> ScheduleResult<CapacityPlan> {
    validate_config(config).map_err(ConfigError)?;

    let days_count = config.days_count();
    let daily_minutes = config.daily_minutes();
    let slot_cycle = config
        .slot_cycle_minutes()
        .ok_or_else(|| overflow(config, "slot cycle"))?;
    let slots_per_day = daily_minutes / slot_cycle;
    let max_capacity = slots_per_day
        .checked_mul(i64::from(config.panel_count))
        .and_then(|daily| daily.checked_mul(days_count))
        .ok_or_else(|| overflow(config, "max capacity"))?;

    let plan = CapacityPlan {
        days_count,
        daily_minutes,
        slot_cycle,
        slots_per_day,
        panel_count: config.panel_count,
        max_capacity,
    };
    debug!(drive_id = %config.drive_id, ?plan, "capacity planned");

    if max_capacity <= 0 {
        return Err(ScheduleError::Capacity {
            drive_id: config.drive_id.clone(),
            slots_per_day,
            panel_count: config.panel_count,
            days_count,
        });
    }

    Ok(plan)
}

fn overflow(config: &ScheduleConfig, quantity: &str) -> ScheduleError {
    ConfigError(vec![ValidationError::new(
        ValidationErrorKind::Overflow,
        format!("{quantity} of drive {} overflows", config.drive_id),
    )])
    .into()
}
