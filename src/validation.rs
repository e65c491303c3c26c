//! Input validation for interview scheduling.
//!
//! Checks structural integrity of a drive configuration and its
//! candidate list before any capacity math or allocation runs.
//! Detects:
//! - Inverted date ranges and daily windows
//! - Non-positive slot durations and negative breaks
//! - Blank drive or candidate IDs
//! - Duplicate candidate IDs
//!
//! All checks run to completion so the caller sees every problem at once.

use crate::models::{Candidate, ScheduleConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// A raw value could not be parsed (date, time).
    MalformedValue,
    /// A required value was empty.
    MissingValue,
    /// `end_date` is before `start_date`.
    InvertedDates,
    /// `daily_end_time` is not after `daily_start_time`.
    InvertedTimes,
    /// `slot_duration_minutes` is zero or negative.
    NonPositiveSlotDuration,
    /// `break_duration_minutes` is negative.
    NegativeBreakDuration,
    /// Two candidates share the same ID.
    DuplicateId,
    /// Durations or counts too large to compute capacity with.
    Overflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a drive's schedule configuration.
///
/// Checks:
/// 1. `drive_id` is not blank
/// 2. `end_date >= start_date`
/// 3. `daily_end_time > daily_start_time`
/// 4. `slot_duration_minutes > 0`
/// 5. `break_duration_minutes >= 0`
/// 6. `slot_duration_minutes + break_duration_minutes` fits in an `i64`
///
/// A zero `panel_count` is not rejected here; it surfaces as a capacity
/// error because it leaves no interview slots.
pub fn validate_config(config: &ScheduleConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.drive_id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingValue,
            "drive_id cannot be empty",
        ));
    }

    if config.end_date < config.start_date {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedDates,
            format!(
                "end_date {} is before start_date {}",
                config.end_date, config.start_date
            ),
        ));
    }

    if config.daily_end_time <= config.daily_start_time {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedTimes,
            format!(
                "daily_end_time {} must be after daily_start_time {}",
                config.daily_end_time.format("%H:%M"),
                config.daily_start_time.format("%H:%M")
            ),
        ));
    }

    if config.slot_duration_minutes <= 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveSlotDuration,
            format!(
                "slot_duration_minutes must be positive, got {}",
                config.slot_duration_minutes
            ),
        ));
    }

    if config.break_duration_minutes < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeBreakDuration,
            format!(
                "break_duration_minutes cannot be negative, got {}",
                config.break_duration_minutes
            ),
        ));
    }

    if config.slot_cycle_minutes().is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::Overflow,
            format!(
                "slot_duration_minutes {} plus break_duration_minutes {} overflows",
                config.slot_duration_minutes, config.break_duration_minutes
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a candidate list.
///
/// Every candidate needs a non-blank ID and IDs must be unique, since
/// ranker output is reconciled by ID.
pub fn validate_candidates(candidates: &[Candidate]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingValue,
                format!("Candidate at position {index} has an empty ID"),
            ));
            continue;
        }
        if !seen.insert(candidate.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate candidate ID: {}", candidate.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
