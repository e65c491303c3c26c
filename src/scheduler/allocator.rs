//! Panel round-robin slot allocator.
//!
//! # Algorithm
//!
//! 1. Start at `daily_start_time` on `start_date`, panel 1.
//! 2. For each candidate in ranked order:
//!    - If the slot would run past `daily_end_time`, or the day's time
//!      windows are used up, roll over to the next day. Past `end_date`,
//!      stop: the rest stay unscheduled.
//!    - Assign the candidate to the current (date, time, panel).
//!    - Move to the next panel; after the last panel, return to panel 1
//!      and advance time by one slot cycle.
//!
//! Every panel of a time window is filled before time advances
//! (breadth-first over panels). The output depends only on the config,
//! the capacity plan and the ranked order.
//!
//! # Complexity
//! O(n) in the number of candidates.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::CapacityPlan;
use crate::models::{Candidate, ScheduleConfig, SlotAssignment};

/// Display formats for panel and date labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLabels {
    /// Prefix before the 1-based panel number.
    pub panel_prefix: String,
    /// `chrono` format string for the date label.
    pub date_format: String,
}

impl Default for SlotLabels {
    fn default() -> Self {
        Self {
            panel_prefix: "Panel".to_string(),
            date_format: "%b %d, %Y".to_string(),
        }
    }
}

/// A date label format that chrono cannot render for a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date label format {format:?}: {reason}")]
pub struct InvalidDateFormat {
    pub format: String,
    pub reason: &'static str,
}

impl SlotLabels {
    /// Label formats, with `date_format` checked.
    pub fn new(
        panel_prefix: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Result<Self, InvalidDateFormat> {
        let labels = Self {
            panel_prefix: panel_prefix.into(),
            date_format: date_format.into(),
        };
        labels.validate()?;
        Ok(labels)
    }

    /// Checks that `date_format` parses and needs nothing but a date.
    ///
    /// Time-of-day or offset specifiers (`%H`, `%z`) parse fine but
    /// cannot be rendered from a `NaiveDate`, so a sample date is
    /// rendered as well.
    pub fn validate(&self) -> Result<(), InvalidDateFormat> {
        let invalid = |reason| InvalidDateFormat {
            format: self.date_format.clone(),
            reason,
        };
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid("unknown or incomplete specifier"));
        }
        let sample = NaiveDate::from_ymd_opt(2026, 3, 25).unwrap_or_default();
        let mut rendered = String::new();
        write!(rendered, "{}", sample.format(&self.date_format))
            .map_err(|_| invalid("needs fields a calendar date does not have"))?;
        Ok(())
    }

    fn panel(&self, panel: u32) -> String {
        format!("{} {}", self.panel_prefix, panel)
    }

    fn date(&self, date: NaiveDate) -> String {
        let mut label = String::new();
        match write!(label, "{}", date.format(&self.date_format)) {
            Ok(()) => label,
            Err(_) => date.to_string(),
        }
    }
}

/// Result of one allocation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Assignments in allocation order.
    pub assignments: Vec<SlotAssignment>,
    /// Candidates left over once the date range ran out, in ranked order.
    pub unscheduled: Vec<String>,
}

impl Allocation {
    /// Whether some candidates did not fit.
    pub fn is_truncated(&self) -> bool {
        !self.unscheduled.is_empty()
    }
}

/// Assigns ranked candidates to (date, time, panel) slots.
///
/// # Example
///
/// ```
/// use interview_slots::models::{Candidate, ScheduleConfig};
/// use interview_slots::scheduler::{plan_capacity, SlotAllocator};
///
/// let config = ScheduleConfig::parse("d1", "2026-03-25", "2026-03-26", "09:00", "17:00").unwrap();
/// let plan = plan_capacity(&config).unwrap();
/// let candidates: Vec<Candidate> = (0..3).map(|i| Candidate::new(format!("c{i}"))).collect();
/// let ranked: Vec<&Candidate> = candidates.iter().collect();
///
/// let allocation = SlotAllocator::new(&config, &plan).allocate(&ranked);
/// assert_eq!(allocation.assignments.len(), 3);
/// assert_eq!(allocation.assignments[1].panel_label, "Panel 2");
/// ```
#[derive(Debug, Clone)]
pub struct SlotAllocator<'a> {
    config: &'a ScheduleConfig,
    plan: &'a CapacityPlan,
    labels: SlotLabels,
}

impl<'a> SlotAllocator<'a> {
    /// Creates an allocator for a validated config and its plan.
    pub fn new(config: &'a ScheduleConfig, plan: &'a CapacityPlan) -> Self {
        Self {
            config,
            plan,
            labels: SlotLabels::default(),
        }
    }

    /// Sets label formats.
    ///
    /// # Errors
    /// [`InvalidDateFormat`] if the date format cannot label a date.
    pub fn with_labels(mut self, labels: SlotLabels) -> Result<Self, InvalidDateFormat> {
        labels.validate()?;
        self.labels = labels;
        Ok(self)
    }

    /// Allocates slots in ranked order.
    ///
    /// Produces `min(ranked.len(), plan.max_capacity)` assignments.
    pub fn allocate(&self, ranked: &[&Candidate]) -> Allocation {
        let config = self.config;
        let slot = Duration::minutes(config.slot_duration_minutes);
        let cycle = Duration::minutes(self.plan.slot_cycle);

        let mut assignments = Vec::with_capacity(ranked.len().min(self.plan.capacity()));
        let mut current_date = config.start_date;
        let mut current_time = config.opening_on(current_date);
        let mut closing = config.closing_on(current_date);
        let mut windows_used: i64 = 0;
        let mut panel: u32 = 1;
        let mut stopped_at = ranked.len();

        for (index, candidate) in ranked.iter().enumerate() {
            // Day rollover
            if current_time + slot > closing || windows_used >= self.plan.slots_per_day {
                match current_date.succ_opt() {
                    Some(next) if next <= config.end_date => current_date = next,
                    _ => {
                        stopped_at = index;
                        break;
                    }
                }
                current_time = config.opening_on(current_date);
                closing = config.closing_on(current_date);
                windows_used = 0;
            }

            assignments.push(self.assign(candidate, panel, current_time, current_time + slot));

            panel += 1;
            if panel > config.panel_count {
                panel = 1;
                current_time += cycle;
                windows_used += 1;
            }
        }

        let unscheduled = ranked[stopped_at..]
            .iter()
            .map(|c| c.id.clone())
            .collect();

        Allocation {
            assignments,
            unscheduled,
        }
    }

    fn assign(
        &self,
        candidate: &Candidate,
        panel: u32,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> SlotAssignment {
        SlotAssignment {
            id: SlotAssignment::composite_id(&candidate.id, start_time),
            drive_id: self.config.drive_id.clone(),
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            panel,
            panel_label: self.labels.panel(panel),
            start_time,
            end_time,
            date_label: self.labels.date(start_time.date()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::plan_capacity;
    use chrono::NaiveTime;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    fn example_config() -> ScheduleConfig {
        ScheduleConfig::parse("drive-1", "2026-03-25", "2026-03-26", "09:00", "17:00")
            .unwrap()
            .with_slot_duration(25)
            .with_break_duration(5)
            .with_panels(2)
    }

    fn make_candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| {
                Candidate::new(format!("c{i}"))
                    .with_name(format!("Candidate {i}"))
                    .with_email(format!("c{i}@example.edu"))
            })
            .collect()
    }

    fn allocate(config: &ScheduleConfig, candidates: &[Candidate]) -> Allocation {
        let plan = plan_capacity(config).unwrap();
        let ranked: Vec<&Candidate> = candidates.iter().collect();
        SlotAllocator::new(config, &plan).allocate(&ranked)
    }

    fn hm(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    /// Checks the structural invariants every allocation must satisfy.
    fn assert_invariants(config: &ScheduleConfig, allocation: &Allocation) {
        let mut keys = HashSet::new();
        let mut panels_by_window: HashMap<(NaiveDate, NaiveTime), Vec<u32>> = HashMap::new();

        for a in &allocation.assignments {
            assert_eq!(a.duration_minutes(), config.slot_duration_minutes);
            assert!(a.panel >= 1 && a.panel <= config.panel_count);
            assert!(config.covers(a.date()));
            assert!(a.start_time >= config.opening_on(a.date()));
            assert!(a.end_time <= config.closing_on(a.date()));
            assert!(keys.insert(a.slot_key()), "slot reused: {:?}", a.slot_key());
            panels_by_window
                .entry((a.date(), a.time()))
                .or_default()
                .push(a.panel);
        }

        // Every window but the last is full, and panels fill in order.
        let mut windows: Vec<_> = panels_by_window.into_iter().collect();
        windows.sort_by_key(|(k, _)| *k);
        let last = windows.len().saturating_sub(1);
        for (i, (_, panels)) in windows.iter().enumerate() {
            let expected: Vec<u32> = (1..=panels.len() as u32).collect();
            assert_eq!(panels, &expected);
            if i < last {
                assert_eq!(panels.len() as u32, config.panel_count);
            }
        }
    }

    #[test]
    fn test_breadth_first_over_panels() {
        let config = example_config();
        let allocation = allocate(&config, &make_candidates(5));
        let got: Vec<(String, String, String, u32)> = allocation
            .assignments
            .iter()
            .map(|a| {
                (
                    a.candidate_id.clone(),
                    a.start_time.format("%H:%M").to_string(),
                    a.end_time.format("%H:%M").to_string(),
                    a.panel,
                )
            })
            .collect();

        let expected = [
            ("c0", "09:00", "09:25", 1),
            ("c1", "09:00", "09:25", 2),
            ("c2", "09:30", "09:55", 1),
            ("c3", "09:30", "09:55", 2),
            ("c4", "10:00", "10:25", 1),
        ];
        for (g, e) in got.iter().zip(expected.iter()) {
            assert_eq!(g.0, e.0);
            assert_eq!(g.1, e.1);
            assert_eq!(g.2, e.2);
            assert_eq!(g.3, e.3);
        }
        assert!(allocation
            .assignments
            .iter()
            .all(|a| a.date_label == "Mar 25, 2026"));
        assert!(!allocation.is_truncated());
    }

    #[test]
    fn test_assignment_fields() {
        let config = example_config();
        let allocation = allocate(&config, &make_candidates(1));
        let a = &allocation.assignments[0];
        assert_eq!(a.id, "c0_2026-03-25T09:00");
        assert_eq!(a.drive_id, "drive-1");
        assert_eq!(a.name, "Candidate 0");
        assert_eq!(a.email, "c0@example.edu");
        assert_eq!(a.panel_label, "Panel 1");
    }

    #[test]
    fn test_day_rollover() {
        let config = example_config();
        // 32 interviews per day: candidate 32 opens day two
        let allocation = allocate(&config, &make_candidates(34));
        let a31 = &allocation.assignments[31];
        assert_eq!(a31.time(), hm("16:30"));
        assert_eq!(a31.panel, 2);
        assert_eq!(a31.end_time.time(), hm("16:55"));

        let a32 = &allocation.assignments[32];
        assert_eq!(a32.date_label, "Mar 26, 2026");
        assert_eq!(a32.time(), hm("09:00"));
        assert_eq!(a32.panel, 1);
        assert_invariants(&config, &allocation);
    }

    #[test]
    fn test_truncation_when_demand_exceeds_capacity() {
        let config = example_config();
        let allocation = allocate(&config, &make_candidates(100));
        assert_eq!(allocation.assignments.len(), 64);
        assert_eq!(allocation.unscheduled.len(), 36);
        assert_eq!(allocation.unscheduled[0], "c64");
        assert!(allocation.is_truncated());
        assert_invariants(&config, &allocation);
    }

    #[test]
    fn test_exact_capacity_is_not_truncated() {
        let config = example_config();
        let allocation = allocate(&config, &make_candidates(64));
        assert_eq!(allocation.assignments.len(), 64);
        assert!(!allocation.is_truncated());
    }

    #[test]
    fn test_leftover_minutes_do_not_exceed_capacity() {
        // 55 minutes with a 30-minute cycle: a second 25-minute slot would
        // still end by 09:55, but capacity says one window per day.
        let config = ScheduleConfig::parse("d", "2026-03-25", "2026-03-26", "09:00", "09:55")
            .unwrap()
            .with_panels(1);
        let allocation = allocate(&config, &make_candidates(5));
        assert_eq!(allocation.assignments.len(), 2);
        assert_eq!(allocation.assignments[1].date_label, "Mar 26, 2026");
        assert_invariants(&config, &allocation);
    }

    #[test]
    fn test_single_panel_sequential() {
        let config = example_config().with_panels(1).with_break_duration(0);
        let allocation = allocate(&config, &make_candidates(3));
        let starts: Vec<_> = allocation.assignments.iter().map(|a| a.time()).collect();
        assert_eq!(starts, vec![hm("09:00"), hm("09:25"), hm("09:50")]);
    }

    #[test]
    fn test_empty_input() {
        let config = example_config();
        let allocation = allocate(&config, &[]);
        assert!(allocation.assignments.is_empty());
        assert!(allocation.unscheduled.is_empty());
    }

    #[test]
    fn test_custom_labels() {
        let config = example_config();
        let plan = plan_capacity(&config).unwrap();
        let candidates = make_candidates(2);
        let ranked: Vec<&Candidate> = candidates.iter().collect();
        let labels = SlotLabels {
            panel_prefix: "Room".into(),
            date_format: "%Y-%m-%d".into(),
        };
        let allocation = SlotAllocator::new(&config, &plan)
            .with_labels(labels)
            .unwrap()
            .allocate(&ranked);
        assert_eq!(allocation.assignments[1].panel_label, "Room 2");
        assert_eq!(allocation.assignments[1].date_label, "2026-03-25");
    }

    #[test]
    fn test_rejects_unrenderable_date_formats() {
        let config = example_config();
        let plan = plan_capacity(&config).unwrap();

        for format in ["%Q", "%Y-%", "%H:%M", "%z"] {
            let labels = SlotLabels {
                panel_prefix: "Panel".into(),
                date_format: format.into(),
            };
            let err = SlotAllocator::new(&config, &plan)
                .with_labels(labels)
                .unwrap_err();
            assert_eq!(err.format, format);
        }
    }

    #[test]
    fn test_label_constructor_checks_format() {
        assert!(SlotLabels::new("Room", "%d/%m/%Y").is_ok());
        assert!(SlotLabels::new("Room", "%Q").is_err());
        assert!(SlotLabels::default().validate().is_ok());
    }

    #[test]
    fn test_deterministic() {
        let config = example_config();
        let candidates = make_candidates(40);
        let first = allocate(&config, &candidates);
        let second = allocate(&config, &candidates);
        assert_eq!(
            serde_json::to_string(&first.assignments).unwrap(),
            serde_json::to_string(&second.assignments).unwrap()
        );
    }

    #[test]
    fn test_ranked_order_is_followed() {
        let config = example_config();
        let mut candidates = make_candidates(10);
        let mut rng = StdRng::seed_from_u64(11);
        candidates.shuffle(&mut rng);

        let allocation = allocate(&config, &candidates);
        let order: Vec<&str> = allocation
            .assignments
            .iter()
            .map(|a| a.candidate_id.as_str())
            .collect();
        let expected: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_random_configs_hold_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        for _ in 0..200 {
            let days = rng.random_range(0..4i64);
            let open = rng.random_range(7 * 60..11 * 60u32);
            let length = rng.random_range(30..9 * 60u32);
            let close = (open + length).min(23 * 60 + 59);
            let config = ScheduleConfig::new(
                "prop",
                start,
                start + Duration::days(days),
                NaiveTime::from_num_seconds_from_midnight_opt(open * 60, 0).unwrap(),
                NaiveTime::from_num_seconds_from_midnight_opt(close * 60, 0).unwrap(),
            )
            .with_slot_duration(rng.random_range(10..60))
            .with_break_duration(rng.random_range(0..20))
            .with_panels(rng.random_range(1..5));

            let Ok(plan) = plan_capacity(&config) else {
                continue;
            };
            let n = rng.random_range(0..(plan.capacity() * 2 + 2));
            let allocation = allocate(&config, &make_candidates(n));

            assert_eq!(allocation.assignments.len(), n.min(plan.capacity()));
            assert_eq!(
                allocation.assignments.len() + allocation.unscheduled.len(),
                n
            );
            assert_invariants(&config, &allocation);
        }
    }
}
