//! Drive schedule configuration.
//!
//! Describes the interview window of a recruitment drive: an inclusive
//! date range, a daily time-of-day window, slot and break lengths, and
//! the number of parallel panels.
//!
//! # Time Model
//! Dates and times are naive (no timezone). One fixed timezone per
//! deployment is assumed; the consumer defines which one.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::{ValidationError, ValidationErrorKind};

const DEFAULT_SLOT_MINUTES: i64 = 25;
const DEFAULT_BREAK_MINUTES: i64 = 5;
const DEFAULT_PANELS: u32 = 2;

/// Time-window configuration for one drive.
///
/// On the wire dates are `YYYY-MM-DD` and times of day are `HH:MM`.
/// Omitted durations and panel counts fall back to 25/5/2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Drive this schedule belongs to.
    pub drive_id: String,
    /// First interview day.
    pub start_date: NaiveDate,
    /// Last interview day (inclusive).
    pub end_date: NaiveDate,
    /// Daily window start.
    #[serde(with = "time_of_day")]
    pub daily_start_time: NaiveTime,
    /// Daily window end. No interview may run past it.
    #[serde(with = "time_of_day")]
    pub daily_end_time: NaiveTime,
    /// Interview length in minutes.
    #[serde(default = "default_slot_minutes", alias = "slot_duration_mins")]
    pub slot_duration_minutes: i64,
    /// Gap after each time window in minutes.
    #[serde(default = "default_break_minutes", alias = "break_duration_mins")]
    pub break_duration_minutes: i64,
    /// Number of interview panels running in parallel.
    #[serde(default = "default_panels", alias = "panels")]
    pub panel_count: u32,
}

fn default_slot_minutes() -> i64 {
    DEFAULT_SLOT_MINUTES
}

fn default_break_minutes() -> i64 {
    DEFAULT_BREAK_MINUTES
}

fn default_panels() -> u32 {
    DEFAULT_PANELS
}

impl ScheduleConfig {
    /// Creates a config with default slot (25), break (5) and panel (2) values.
    pub fn new(
        drive_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        daily_start_time: NaiveTime,
        daily_end_time: NaiveTime,
    ) -> Self {
        Self {
            drive_id: drive_id.into(),
            start_date,
            end_date,
            daily_start_time,
            daily_end_time,
            slot_duration_minutes: DEFAULT_SLOT_MINUTES,
            break_duration_minutes: DEFAULT_BREAK_MINUTES,
            panel_count: DEFAULT_PANELS,
        }
    }

    /// Builds a config from raw strings (`YYYY-MM-DD`, `HH:MM`).
    ///
    /// Every unparseable or blank field is reported, not just the first.
    pub fn parse(
        drive_id: &str,
        start_date: &str,
        end_date: &str,
        daily_start_time: &str,
        daily_end_time: &str,
    ) -> Result<Self, ConfigError> {
        let mut errors = Vec::new();

        let start = parse_date("start_date", start_date, &mut errors);
        let end = parse_date("end_date", end_date, &mut errors);
        let open = parse_time("daily_start_time", daily_start_time, &mut errors);
        let close = parse_time("daily_end_time", daily_end_time, &mut errors);

        match (start, end, open, close) {
            (Some(start), Some(end), Some(open), Some(close)) if errors.is_empty() => {
                Ok(Self::new(drive_id, start, end, open, close))
            }
            _ => Err(ConfigError(errors)),
        }
    }

    /// Sets the interview length.
    pub fn with_slot_duration(mut self, minutes: i64) -> Self {
        self.slot_duration_minutes = minutes;
        self
    }

    /// Sets the break after each time window.
    pub fn with_break_duration(mut self, minutes: i64) -> Self {
        self.break_duration_minutes = minutes;
        self
    }

    /// Sets the number of parallel panels.
    pub fn with_panels(mut self, panels: u32) -> Self {
        self.panel_count = panels;
        self
    }

    /// Number of interview days (inclusive range).
    #[inline]
    pub fn days_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Length of the daily window in minutes.
    #[inline]
    pub fn daily_minutes(&self) -> i64 {
        (self.daily_end_time - self.daily_start_time).num_minutes()
    }

    /// Minutes between consecutive time-window starts.
    ///
    /// `None` if slot plus break overflows.
    #[inline]
    pub fn slot_cycle_minutes(&self) -> Option<i64> {
        self.slot_duration_minutes.checked_add(self.break_duration_minutes)
    }

    /// Start of the daily window on `date`.
    pub fn opening_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.daily_start_time)
    }

    /// End of the daily window on `date`.
    pub fn closing_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.daily_end_time)
    }

    /// Whether `date` falls inside the drive's date range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

fn parse_date(field: &str, raw: &str, errors: &mut Vec<ValidationError>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingValue,
            format!("{field} cannot be empty"),
        ));
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedValue,
                format!("{field} '{raw}' is not a YYYY-MM-DD date: {e}"),
            ));
            None
        }
    }
}

fn parse_time(field: &str, raw: &str, errors: &mut Vec<ValidationError>) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingValue,
            format!("{field} cannot be empty"),
        ));
        return None;
    }
    match time_of_day::parse(raw) {
        Ok(time) => Some(time),
        Err(e) => {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedValue,
                format!("{field} '{raw}' is not an HH:MM time: {e}"),
            ));
            None
        }
    }
}

/// Serde adapter for `HH:MM` times of day (`HH:MM:SS` is also accepted).
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parses `HH:MM`, falling back to `HH:MM:SS`.
    pub fn parse(raw: &str) -> chrono::ParseResult<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).map_err(serde::de::Error::custom)
    }
}
