//! Candidate ranking.
//!
//! A [`Ranker`] orders candidates before allocation. Rankers are soft
//! dependencies: [`rank_with_fallback`] bounds the call with a timeout,
//! reconciles whatever comes back against the candidate set, and falls
//! back to the input order when the ranker errors or times out. A
//! ranker problem never fails a generation run.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use interview_slots::models::Candidate;
//! use interview_slots::ranking::{rank_with_fallback, RankingContext, SkillMatchRanker};
//!
//! let candidates = vec![
//!     Candidate::new("a"),
//!     Candidate::new("b").with_skill("rust"),
//! ];
//! let context = RankingContext::for_drive("d1").with_skill("rust");
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let ranked = runtime.block_on(rank_with_fallback(
//!     &SkillMatchRanker,
//!     &candidates,
//!     &context,
//!     Duration::from_secs(1),
//! ));
//! assert_eq!(ranked.order, vec![1, 0]);
//! ```

mod completion;
mod context;
mod reconcile;
mod rules;

pub use completion::{parse_ranked_ids, CompletionProvider, CompletionRanker};
pub use context::RankingContext;
pub use reconcile::{fallback_order, reconcile_order, Reconciliation};
pub use rules::{InputOrderRanker, SkillMatchRanker};

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Candidate;

/// Errors a ranker may report. None of them are fatal to scheduling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankerError {
    #[error("ranking service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed ranking response: {0}")]
    Malformed(String),

    #[error("all {attempts} ranking models failed")]
    Exhausted { attempts: usize },
}

/// Orders candidates for allocation.
///
/// # Contract
/// Returns candidate IDs, highest priority first. The output is not
/// trusted: unknown, repeated or missing IDs are corrected by
/// [`reconcile_order`].
#[async_trait]
pub trait Ranker: Send + Sync {
    /// Ranker name (for logs and reports).
    fn name(&self) -> &str;

    /// Ranks the candidates.
    async fn rank(
        &self,
        candidates: &[Candidate],
        context: &RankingContext,
    ) -> Result<Vec<String>, RankerError>;
}

/// Why the input order was used instead of the ranker's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The ranker returned an error.
    Error { message: String },
    /// The ranker did not answer in time.
    Timeout { after_ms: u64 },
}

/// How the final order was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Ranker that was consulted.
    pub ranker: String,
    /// Set when the input order was used.
    pub fallback: Option<FallbackReason>,
    /// Unknown IDs dropped from the ranker output.
    pub unknown_dropped: usize,
    /// Repeated IDs dropped from the ranker output.
    pub duplicates_dropped: usize,
    /// Candidates the ranker omitted, appended in input order.
    pub appended: usize,
}

impl RankingOutcome {
    /// Whether the ranker's answer was replaced or corrected.
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
            || self.unknown_dropped > 0
            || self.duplicates_dropped > 0
            || self.appended > 0
    }
}

/// A complete candidate order plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedOrder {
    /// Indices into the candidate slice, highest priority first.
    pub order: Vec<usize>,
    /// Ranking diagnostics.
    pub outcome: RankingOutcome,
}

/// Consults `ranker` under `timeout` and always returns a usable order.
pub async fn rank_with_fallback(
    ranker: &dyn Ranker,
    candidates: &[Candidate],
    context: &RankingContext,
    timeout: Duration,
) -> RankedOrder {
    let name = ranker.name().to_string();

    let fallback = match tokio::time::timeout(timeout, ranker.rank(candidates, context)).await {
        Ok(Ok(ids)) => {
            let reconciled = reconcile_order(candidates, &ids);
            if reconciled.adjusted() {
                warn!(
                    drive_id = %context.drive_id,
                    ranker = %name,
                    unknown = reconciled.unknown_dropped,
                    duplicates = reconciled.duplicates_dropped,
                    appended = reconciled.appended,
                    "ranker output reconciled"
                );
            }
            return RankedOrder {
                order: reconciled.order,
                outcome: RankingOutcome {
                    ranker: name,
                    fallback: None,
                    unknown_dropped: reconciled.unknown_dropped,
                    duplicates_dropped: reconciled.duplicates_dropped,
                    appended: reconciled.appended,
                },
            };
        }
        Ok(Err(e)) => FallbackReason::Error {
            message: e.to_string(),
        },
        Err(_) => FallbackReason::Timeout {
            after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
    };

    warn!(
        drive_id = %context.drive_id,
        ranker = %name,
        ?fallback,
        "ranker failed, using input order"
    );
    RankedOrder {
        order: fallback_order(candidates.len()),
        outcome: RankingOutcome {
            ranker: name,
            fallback: Some(fallback),
            unknown_dropped: 0,
            duplicates_dropped: 0,
            appended: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed answer, optionally after a delay.
    struct StubRanker {
        answer: Result<Vec<String>, RankerError>,
        delay: Duration,
    }

    impl StubRanker {
        fn answering(ids: &[&str]) -> Self {
            Self {
                answer: Ok(ids.iter().map(|s| s.to_string()).collect()),
                delay: Duration::ZERO,
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err(RankerError::Unavailable("connection refused".into())),
                delay: Duration::ZERO,
            }
        }

        fn slow(ids: &[&str], delay: Duration) -> Self {
            Self {
                delay,
                ..Self::answering(ids)
            }
        }
    }

    #[async_trait]
    impl Ranker for StubRanker {
        fn name(&self) -> &str {
            "stub"
        }

        async fn rank(
            &self,
            _candidates: &[Candidate],
            _context: &RankingContext,
        ) -> Result<Vec<String>, RankerError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.answer.clone()
        }
    }

    fn pool() -> Vec<Candidate> {
        ["a", "b", "c"].iter().map(|id| Candidate::new(*id)).collect()
    }

    fn ctx() -> RankingContext {
        RankingContext::for_drive("d1")
    }

    #[tokio::test]
    async fn test_clean_answer() {
        let ranked = rank_with_fallback(
            &StubRanker::answering(&["c", "b", "a"]),
            &pool(),
            &ctx(),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(ranked.order, vec![2, 1, 0]);
        assert!(!ranked.outcome.is_degraded());
        assert_eq!(ranked.outcome.ranker, "stub");
    }

    #[tokio::test]
    async fn test_partial_answer_is_reconciled() {
        let ranked = rank_with_fallback(
            &StubRanker::answering(&["zz", "b", "b"]),
            &pool(),
            &ctx(),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(ranked.order, vec![1, 0, 2]);
        assert_eq!(ranked.outcome.unknown_dropped, 1);
        assert_eq!(ranked.outcome.duplicates_dropped, 1);
        assert_eq!(ranked.outcome.appended, 2);
        assert!(ranked.outcome.fallback.is_none());
        assert!(ranked.outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_error_falls_back_to_input_order() {
        let ranked =
            rank_with_fallback(&StubRanker::failing(), &pool(), &ctx(), Duration::from_secs(1))
                .await;
        assert_eq!(ranked.order, vec![0, 1, 2]);
        assert!(matches!(
            ranked.outcome.fallback,
            Some(FallbackReason::Error { ref message }) if message.contains("connection refused")
        ));
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_input_order() {
        let ranker = StubRanker::slow(&["c", "b", "a"], Duration::from_secs(60));
        let ranked = rank_with_fallback(&ranker, &pool(), &ctx(), Duration::from_millis(250)).await;
        assert_eq!(ranked.order, vec![0, 1, 2]);
        assert_eq!(
            ranked.outcome.fallback,
            Some(FallbackReason::Timeout { after_ms: 250 })
        );
    }

    #[test]
    fn test_fallback_reason_serializes_tagged() {
        let json = serde_json::to_value(FallbackReason::Timeout { after_ms: 5 }).unwrap();
        assert_eq!(json["reason"], "timeout");
        assert_eq!(json["after_ms"], 5);
    }
}
