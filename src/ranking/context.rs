//! Ranking context passed to rankers.

use serde::{Deserialize, Serialize};

/// Prioritization hints for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingContext {
    /// Drive being scheduled.
    pub drive_id: String,
    /// Skills the drive asks for (e.g. from the job description).
    pub target_skills: Vec<String>,
}

impl RankingContext {
    /// Creates a context for a drive with no skill hints.
    pub fn for_drive(drive_id: impl Into<String>) -> Self {
        Self {
            drive_id: drive_id.into(),
            ..Default::default()
        }
    }

    /// Adds a target skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.target_skills.push(skill.into());
        self
    }

    /// Replaces the target skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_skills = skills.into_iter().map(Into::into).collect();
        self
    }
}
