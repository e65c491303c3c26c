//! Candidate model.
//!
//! A candidate is a person eligible for a drive's interview schedule,
//! as supplied by the eligibility directory for one generation call.
//! Candidates are not persisted; their name and email are copied onto
//! each slot assignment for downstream notification.

use serde::{Deserialize, Serialize};

/// A candidate to be scheduled.
///
/// Unrecognized fields in directory records are dropped on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier (student USN in directory records).
    #[serde(alias = "usn")]
    pub id: String,
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Declared skills, used by rankers.
    #[serde(default)]
    pub skills: Vec<String>,
}

fn default_name() -> String {
    "Student".to_string()
}

impl Candidate {
    /// Creates a candidate with the given ID and placeholder contact details.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: default_name(),
            email: String::new(),
            skills: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Whether the candidate lists `skill` (case-insensitive).
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}
