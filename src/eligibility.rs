//! Candidate sourcing.
//!
//! The engine never decides who is eligible for a drive. It hands an
//! [`EligibilityCriteria`] to a [`CandidateSource`] (the student
//! directory) and schedules whatever comes back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::Candidate;

/// Backlog ceiling applied when a drive does not set one.
pub const DEFAULT_MAX_BACKLOGS: u32 = 10;

/// Errors reported by a candidate source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("candidate directory unavailable: {0}")]
    Unavailable(String),

    #[error("drive {0} not found")]
    UnknownDrive(String),

    #[error("malformed candidate record: {0}")]
    Malformed(String),
}

/// Filter predicates for a drive's candidate pool.
///
/// Carried as data only; the [`CandidateSource`] evaluates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    /// Drive being scheduled.
    pub drive_id: String,
    /// College whose students are considered.
    pub college_id: String,
    /// Minimum CGPA.
    #[serde(default)]
    pub min_cgpa: Option<f64>,
    /// Maximum number of active backlogs.
    #[serde(default = "default_max_backlogs")]
    pub max_backlogs: u32,
    /// Allowed branches (empty = all).
    #[serde(default)]
    pub branches: Vec<String>,
    /// Allowed graduation years (empty = all).
    #[serde(default)]
    pub graduation_years: Vec<i32>,
    /// Gender restriction, if any.
    #[serde(default)]
    pub gender: Option<String>,
    /// Minimum attendance percentage.
    #[serde(default)]
    pub min_attendance_pct: Option<f64>,
    /// Minimum mock-test score.
    #[serde(default)]
    pub min_mock_score: Option<f64>,
    /// Restrict to these student IDs (students who applied).
    #[serde(default)]
    pub applicant_ids: Option<Vec<String>>,
}

fn default_max_backlogs() -> u32 {
    DEFAULT_MAX_BACKLOGS
}

impl EligibilityCriteria {
    /// Criteria with no filters beyond the default backlog ceiling.
    pub fn new(drive_id: impl Into<String>, college_id: impl Into<String>) -> Self {
        Self {
            drive_id: drive_id.into(),
            college_id: college_id.into(),
            min_cgpa: None,
            max_backlogs: DEFAULT_MAX_BACKLOGS,
            branches: Vec::new(),
            graduation_years: Vec::new(),
            gender: None,
            min_attendance_pct: None,
            min_mock_score: None,
            applicant_ids: None,
        }
    }

    pub fn with_min_cgpa(mut self, cgpa: f64) -> Self {
        self.min_cgpa = Some(cgpa);
        self
    }

    pub fn with_max_backlogs(mut self, backlogs: u32) -> Self {
        self.max_backlogs = backlogs;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branches.push(branch.into());
        self
    }

    pub fn with_graduation_year(mut self, year: i32) -> Self {
        self.graduation_years.push(year);
        self
    }

    /// Adds graduation years from free-form batch labels.
    ///
    /// Labels that are not plain digits (e.g. `"2025-26"`, `"TBD"`) are
    /// ignored.
    pub fn with_target_batches<I, S>(mut self, batches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for batch in batches {
            let batch = batch.as_ref().trim();
            if batch.is_empty() || !batch.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Ok(year) = batch.parse() {
                self.graduation_years.push(year);
            }
        }
        self
    }

    /// Sets the gender restriction. `"Any"` and blank mean no restriction.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        let gender = gender.into();
        let trimmed = gender.trim();
        self.gender = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn with_min_attendance(mut self, pct: f64) -> Self {
        self.min_attendance_pct = Some(pct);
        self
    }

    pub fn with_min_mock_score(mut self, score: f64) -> Self {
        self.min_mock_score = Some(score);
        self
    }

    /// Restricts the pool to the given applicants.
    pub fn with_applicants<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicant_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

/// Produces the candidate pool for a drive.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Returns candidates matching `criteria`, in directory order.
    async fn eligible_candidates(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<Candidate>, SourceError>;
}

/// A source that always returns the same candidates.
///
/// Criteria are ignored except for the applicant restriction.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    candidates: Vec<Candidate>,
}

impl StaticCandidateSource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl CandidateSource for StaticCandidateSource {
    async fn eligible_candidates(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<Candidate>, SourceError> {
        let pool = match &criteria.applicant_ids {
            Some(ids) => self
                .candidates
                .iter()
                .filter(|c| ids.contains(&c.id))
                .cloned()
                .collect(),
            None => self.candidates.clone(),
        };
        Ok(pool)
    }
}
