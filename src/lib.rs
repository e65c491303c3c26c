//! Interview slot scheduling for recruitment drives.
//!
//! Given a drive's date range, daily window, slot length and number of
//! parallel interview panels, the engine orders the candidate pool with a
//! pluggable ranker, assigns each candidate a (date, time, panel) slot and
//! stores the result as the drive's single authoritative schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ScheduleConfig`, `Candidate`,
//!   `SlotAssignment`, `StoredSchedule`
//! - **`validation`**: Input checks that report every problem at once
//! - **`scheduler`**: Capacity planning, panel round-robin allocation, KPIs
//! - **`ranking`**: `Ranker` trait, built-in rankers, timeout and fallback
//! - **`store`**: Atomic per-drive schedule replacement (memory, redb)
//! - **`eligibility`**: `CandidateSource` contract for the student directory
//! - **`engine`**: The generation pipeline tying it all together
//! - **`settings`**: TOML-backed engine tunables
//!
//! # Pipeline
//!
//! ```text
//! ScheduleConfig ─► plan_capacity ─► rank_with_fallback ─► SlotAllocator ─► ScheduleStore::replace
//!                                       ▲
//!                             candidates┘
//! ```

pub mod eligibility;
pub mod engine;
pub mod error;
pub mod models;
pub mod ranking;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod validation;

pub use engine::{GenerationReport, GenerationRequest, SchedulingEngine};
pub use error::{ConfigError, ScheduleError, ScheduleResult, StoreError, StoreResult};
pub use settings::EngineSettings;
