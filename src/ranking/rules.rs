//! Built-in local rankers.
//!
//! Both rankers are deterministic and never fail, which makes them
//! suitable as test bindings and as offline replacements for an
//! external ranking service.

use async_trait::async_trait;

use super::{Ranker, RankerError, RankingContext};
use crate::models::Candidate;

/// Keeps the input order unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOrderRanker;

#[async_trait]
impl Ranker for InputOrderRanker {
    fn name(&self) -> &str {
        "input-order"
    }

    async fn rank(
        &self,
        candidates: &[Candidate],
        _context: &RankingContext,
    ) -> Result<Vec<String>, RankerError> {
        Ok(candidates.iter().map(|c| c.id.clone()).collect())
    }
}

/// Skill Match.
///
/// Orders candidates by how many of the target skills they list
/// (case-insensitive), most matches first. Ties keep input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillMatchRanker;

impl SkillMatchRanker {
    /// Number of target skills the candidate lists.
    pub fn score(candidate: &Candidate, context: &RankingContext) -> usize {
        context
            .target_skills
            .iter()
            .filter(|skill| candidate.has_skill(skill))
            .count()
    }
}

#[async_trait]
impl Ranker for SkillMatchRanker {
    fn name(&self) -> &str {
        "skill-match"
    }

    async fn rank(
        &self,
        candidates: &[Candidate],
        context: &RankingContext,
    ) -> Result<Vec<String>, RankerError> {
        let scores: Vec<usize> = candidates
            .iter()
            .map(|c| Self::score(c, context))
            .collect();
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        // Stable sort keeps input order among equal scores
        indices.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
        Ok(indices.into_iter().map(|i| candidates[i].id.clone()).collect())
    }
}
