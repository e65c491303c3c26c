//! Reconciles ranker output against the known candidate set.
//!
//! Ranker output is untrusted. Unknown IDs are dropped, repeated IDs
//! keep their first position, and candidates the ranker omitted are
//! appended in input order, so every candidate appears exactly once.

use std::collections::HashMap;

use crate::models::Candidate;

/// A validated ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Indices into the candidate slice, highest priority first.
    pub order: Vec<usize>,
    /// IDs returned by the ranker that match no candidate.
    pub unknown_dropped: usize,
    /// Repeated IDs ignored after their first occurrence.
    pub duplicates_dropped: usize,
    /// Candidates missing from the ranker output, appended at the end.
    pub appended: usize,
}

impl Reconciliation {
    /// Whether the ranker output needed any correction.
    pub fn adjusted(&self) -> bool {
        self.unknown_dropped > 0 || self.duplicates_dropped > 0 || self.appended > 0
    }
}

/// Builds a complete, duplicate-free order from ranker output.
///
/// Candidate IDs are assumed unique. Ranked IDs are matched after
/// trimming surrounding whitespace.
pub fn reconcile_order(candidates: &[Candidate], ranked_ids: &[String]) -> Reconciliation {
    let index: HashMap<&str, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.as_str(), i))
        .collect();

    let mut placed = vec![false; candidates.len()];
    let mut result = Reconciliation {
        order: Vec::with_capacity(candidates.len()),
        ..Default::default()
    };

    for id in ranked_ids {
        match index.get(id.trim()) {
            Some(&i) if placed[i] => result.duplicates_dropped += 1,
            Some(&i) => {
                placed[i] = true;
                result.order.push(i);
            }
            None => result.unknown_dropped += 1,
        }
    }

    for (i, was_placed) in placed.iter().enumerate() {
        if !was_placed {
            result.order.push(i);
            result.appended += 1;
        }
    }

    result
}

/// The input order, used when the ranker cannot be consulted.
pub fn fallback_order(candidate_count: usize) -> Vec<usize> {
    (0..candidate_count).collect()
}
