//! Schedule generation pipeline.
//!
//! # Stages
//!
//! | Stage | Work | Failure |
//! |-------|------|---------|
//! | Validating | Config checks, capacity plan, candidate checks, label formats | `Config`, `Capacity`, `EmptyCandidateSet`, `InvalidCandidates`, `Labels` |
//! | Ranking | Ranker call under timeout, reconciliation | never fails; falls back to input order |
//! | Allocating | Panel round-robin over the ranked order | never fails; truncates at capacity |
//! | Persisting | Atomic replace of the drive's schedule | `Persistence` |
//! | Done | Report returned | |
//!
//! Nothing is written before `Persisting`, so a failed run leaves any
//! previous schedule for the drive in place.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use interview_slots::engine::{GenerationRequest, SchedulingEngine};
//! use interview_slots::models::{Candidate, ScheduleConfig};
//! use interview_slots::ranking::InputOrderRanker;
//! use interview_slots::store::MemoryScheduleStore;
//!
//! let engine = SchedulingEngine::new(
//!     Arc::new(InputOrderRanker),
//!     Arc::new(MemoryScheduleStore::new()),
//! );
//! let config = ScheduleConfig::parse("d1", "2026-03-25", "2026-03-26", "09:00", "17:00").unwrap();
//! let request = GenerationRequest::new(config, vec![Candidate::new("a"), Candidate::new("b")]);
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let report = runtime.block_on(engine.generate(&request)).unwrap();
//! assert_eq!(report.scheduled_count, 2);
//! assert_eq!(report.generation, 1);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::eligibility::{CandidateSource, EligibilityCriteria};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Candidate, ScheduleConfig, SlotAssignment, StoredSchedule};
use crate::ranking::{rank_with_fallback, Ranker, RankingContext, RankingOutcome};
use crate::scheduler::{plan_capacity, CapacityPlan, ScheduleKpi, SlotAllocator};
use crate::settings::EngineSettings;
use crate::store::ScheduleStore;
use crate::validation::validate_candidates;

/// Pipeline stage of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStage {
    Validating,
    Ranking,
    Allocating,
    Persisting,
    Done,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Ranking => "ranking",
            Self::Allocating => "allocating",
            Self::Persisting => "persisting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Input of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub config: ScheduleConfig,
    pub candidates: Vec<Candidate>,
    /// Skills the drive is hiring for; passed to the ranker.
    #[serde(default)]
    pub target_skills: Vec<String>,
}

impl GenerationRequest {
    pub fn new(config: ScheduleConfig, candidates: Vec<Candidate>) -> Self {
        Self {
            config,
            candidates,
            target_skills: Vec::new(),
        }
    }

    pub fn with_target_skill(mut self, skill: impl Into<String>) -> Self {
        self.target_skills.push(skill.into());
        self
    }

    pub fn with_target_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    fn ranking_context(&self) -> RankingContext {
        RankingContext::for_drive(&self.config.drive_id).with_skills(self.target_skills.iter())
    }
}

/// Result of a successful generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub drive_id: String,
    /// Generation number assigned by the store.
    pub generation: u64,
    /// Candidates supplied.
    pub requested_count: usize,
    /// Candidates given a slot.
    pub scheduled_count: usize,
    /// Candidates that did not fit, in ranked order.
    pub unscheduled: Vec<String>,
    pub capacity: CapacityPlan,
    pub ranking: RankingOutcome,
    pub assignments: Vec<SlotAssignment>,
}

impl GenerationReport {
    /// Whether demand exceeded capacity.
    pub fn is_truncated(&self) -> bool {
        self.scheduled_count < self.requested_count
    }

    pub fn kpi(&self) -> ScheduleKpi {
        ScheduleKpi::calculate(&self.assignments, &self.capacity)
    }
}

/// Generates and persists interview schedules.
///
/// Holds its ranker and store as injected handles; cloning the `Arc`s
/// is the only sharing.
#[derive(Clone)]
pub struct SchedulingEngine {
    ranker: Arc<dyn Ranker>,
    store: Arc<dyn ScheduleStore>,
    settings: EngineSettings,
}

impl SchedulingEngine {
    pub fn new(ranker: Arc<dyn Ranker>, store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            ranker,
            store,
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Validates `config` and returns its capacity plan without scheduling.
    pub fn plan(&self, config: &ScheduleConfig) -> ScheduleResult<CapacityPlan> {
        plan_capacity(config)
    }

    /// Current stored schedule for a drive.
    pub fn schedule(&self, drive_id: &str) -> ScheduleResult<Option<StoredSchedule>> {
        Ok(self.store.get(drive_id)?)
    }

    /// Runs the full pipeline and replaces the drive's schedule.
    #[tracing::instrument(
        skip(self, request),
        fields(drive_id = %request.config.drive_id, candidates = request.candidates.len())
    )]
    pub async fn generate(&self, request: &GenerationRequest) -> ScheduleResult<GenerationReport> {
        let config = &request.config;
        let drive_id = config.drive_id.as_str();

        debug!(stage = %GenerationStage::Validating);
        let plan = plan_capacity(config)?;
        if request.candidates.is_empty() {
            return Err(ScheduleError::EmptyCandidateSet(drive_id.to_string()));
        }
        validate_candidates(&request.candidates).map_err(ScheduleError::InvalidCandidates)?;
        let allocator = SlotAllocator::new(config, &plan).with_labels(self.settings.labels())?;

        debug!(stage = %GenerationStage::Ranking, ranker = self.ranker.name());
        let ranked = rank_with_fallback(
            self.ranker.as_ref(),
            &request.candidates,
            &request.ranking_context(),
            self.settings.ranker_timeout(),
        )
        .await;

        debug!(stage = %GenerationStage::Allocating);
        let ordered: Vec<&Candidate> = ranked
            .order
            .iter()
            .map(|&i| &request.candidates[i])
            .collect();
        let allocation = allocator.allocate(&ordered);

        debug!(stage = %GenerationStage::Persisting);
        let stored = self.store.replace(drive_id, allocation.assignments)?;

        let report = GenerationReport {
            drive_id: drive_id.to_string(),
            generation: stored.generation,
            requested_count: request.candidates.len(),
            scheduled_count: stored.assignments.len(),
            unscheduled: allocation.unscheduled,
            capacity: plan,
            ranking: ranked.outcome,
            assignments: stored.assignments,
        };

        debug!(stage = %GenerationStage::Done);
        info!(
            generation = report.generation,
            requested = report.requested_count,
            scheduled = report.scheduled_count,
            max_capacity = plan.max_capacity,
            ranking_fallback = report.ranking.fallback.is_some(),
            "schedule generated"
        );
        Ok(report)
    }

    /// Fetches the eligible pool from `source`, then generates.
    pub async fn generate_from_source(
        &self,
        source: &dyn CandidateSource,
        criteria: &EligibilityCriteria,
        config: ScheduleConfig,
        target_skills: Vec<String>,
    ) -> ScheduleResult<GenerationReport> {
        // Fail on a bad config before querying the directory.
        plan_capacity(&config)?;
        let candidates = source.eligible_candidates(criteria).await?;
        debug!(drive_id = %config.drive_id, fetched = candidates.len(), "candidates fetched");

        let request = GenerationRequest::new(config, candidates).with_target_skills(target_skills);
        self.generate(&request).await
    }
}
