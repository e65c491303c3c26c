//! Error types for schedule generation and persistence.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for engine operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Result type alias for schedule store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A schedule configuration failed validation.
///
/// Carries every problem found, not just the first one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid schedule config: {}", join_messages(.0))]
pub struct ConfigError(pub Vec<ValidationError>);

impl ConfigError {
    /// All validation problems that were detected.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

/// Errors surfaced by a generation run.
///
/// Ranker failures never appear here: they degrade to the fallback order
/// and are reported in [`RankingOutcome`](crate::ranking::RankingOutcome).
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "drive {drive_id} has no interview capacity \
         ({slots_per_day} slots/day x {panel_count} panels x {days_count} days)"
    )]
    Capacity {
        drive_id: String,
        slots_per_day: i64,
        panel_count: u32,
        days_count: i64,
    },

    #[error("invalid engine settings: {0}")]
    Labels(#[from] crate::scheduler::InvalidDateFormat),

    #[error("no eligible candidates to schedule for drive {0}")]
    EmptyCandidateSet(String),

    #[error("invalid candidate list: {}", join_messages(.0))]
    InvalidCandidates(Vec<ValidationError>),

    #[error("candidate source failed: {0}")]
    Source(#[from] crate::eligibility::SourceError),

    #[error("failed to persist schedule: {0}")]
    Persistence(#[from] StoreError),
}

/// Errors that can occur during schedule store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("assignment {assignment_id} belongs to drive {found}, not {expected}")]
    DriveMismatch {
        assignment_id: String,
        expected: String,
        found: String,
    },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_config_error_lists_all_messages() {
        let err = ConfigError(vec![
            ValidationError::new(ValidationErrorKind::InvertedDates, "end before start"),
            ValidationError::new(ValidationErrorKind::NonPositiveSlotDuration, "slot is 0"),
        ]);
        let text = err.to_string();
        assert!(text.contains("end before start"));
        assert!(text.contains("slot is 0"));
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_capacity_error_message() {
        let err = ScheduleError::Capacity {
            drive_id: "d1".into(),
            slots_per_day: 0,
            panel_count: 2,
            days_count: 1,
        };
        assert!(err.to_string().contains("d1"));
        assert!(err.to_string().contains("0 slots/day"));
    }

    #[test]
    fn test_store_error_converts_to_persistence() {
        let err: ScheduleError = StoreError::Write("disk full".into()).into();
        assert!(matches!(err, ScheduleError::Persistence(_)));
    }
}
