//! Capacity planning, slot allocation and KPI evaluation.
//!
//! # Pipeline
//!
//! `plan_capacity` validates a drive config and derives its capacity;
//! `SlotAllocator` places ranked candidates into slots breadth-first
//! over panels; `ScheduleKpi` summarizes the result.

mod allocator;
mod capacity;
mod kpi;

pub use allocator::{Allocation, InvalidDateFormat, SlotAllocator, SlotLabels};
pub use capacity::{plan_capacity, CapacityPlan};
pub use kpi::ScheduleKpi;
