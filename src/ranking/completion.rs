//! Ranker backed by an external text-completion service.
//!
//! The service receives a prompt listing the target skills and the
//! candidates (ID and skills only) and is expected to answer with a
//! JSON array of candidate IDs. Models are tried in order; the first
//! answer that parses wins.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::{Ranker, RankerError, RankingContext};
use crate::models::Candidate;

/// A text-completion backend (LLM or any other reasoning service).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `prompt` to `model` and returns the raw response text.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, RankerError>;
}

/// Ranks candidates by asking a [`CompletionProvider`].
pub struct CompletionRanker<P> {
    provider: P,
    models: Vec<String>,
}

#[derive(Serialize)]
struct PromptCandidate<'a> {
    id: &'a str,
    skills: &'a [String],
}

impl<P: CompletionProvider> CompletionRanker<P> {
    /// Creates a ranker that tries `models` in order.
    pub fn new<I, S>(provider: P, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provider,
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the ranking prompt.
    pub fn build_prompt(
        candidates: &[Candidate],
        context: &RankingContext,
    ) -> Result<String, RankerError> {
        let listed: Vec<PromptCandidate<'_>> = candidates
            .iter()
            .map(|c| PromptCandidate {
                id: &c.id,
                skills: &c.skills,
            })
            .collect();
        let candidates_json =
            serde_json::to_string(&listed).map_err(|e| RankerError::Malformed(e.to_string()))?;
        let skills_json = serde_json::to_string(&context.target_skills)
            .map_err(|e| RankerError::Malformed(e.to_string()))?;

        Ok(format!(
            "You are scheduling technical interviews.\n\
             Rank candidates higher if their skills match these: {skills_json}.\n\
             Candidates: {candidates_json}\n\
             Return ONLY a JSON array of candidate ids, highest priority first. \
             Example: [\"c1\", \"c2\"]"
        ))
    }
}

#[async_trait]
impl<P: CompletionProvider> Ranker for CompletionRanker<P> {
    fn name(&self) -> &str {
        "completion"
    }

    async fn rank(
        &self,
        candidates: &[Candidate],
        context: &RankingContext,
    ) -> Result<Vec<String>, RankerError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = Self::build_prompt(candidates, context)?;

        for model in &self.models {
            let response = match self.provider.complete(model, &prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(%model, error = %e, "completion request failed");
                    continue;
                }
            };
            match parse_ranked_ids(&response) {
                Ok(ids) => {
                    debug!(%model, returned = ids.len(), "completion ranking parsed");
                    return Ok(ids);
                }
                Err(e) => warn!(%model, error = %e, "completion response unusable"),
            }
        }

        Err(RankerError::Exhausted {
            attempts: self.models.len(),
        })
    }
}

/// Extracts a list of IDs from a completion response.
///
/// Accepts a bare JSON array or one wrapped in a Markdown code fence
/// (with or without a `json` tag). Non-string array items are skipped.
pub fn parse_ranked_ids(response: &str) -> Result<Vec<String>, RankerError> {
    let body = strip_code_fence(response.trim());
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| RankerError::Malformed(e.to_string()))?;

    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        other => Err(RankerError::Malformed(format!(
            "expected a JSON array, got {other}"
        ))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let inner = inner.trim_start();
    inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner)
        .trim()
}
