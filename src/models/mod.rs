//! Interview scheduling domain models.
//!
//! | Model | Meaning |
//! |-------|---------|
//! | `ScheduleConfig` | A drive's interview window, slot length and panel count |
//! | `Candidate` | A person to be interviewed |
//! | `SlotAssignment` | One candidate in one (date, time, panel) slot |
//! | `StoredSchedule` | The authoritative assignment set of a drive |

mod candidate;
mod config;
mod schedule;

pub use candidate::Candidate;
pub use config::{time_of_day, ScheduleConfig};
pub use schedule::{SlotAssignment, StoredSchedule};
