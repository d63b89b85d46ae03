use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::aggregation::{
    AggregatedCandidate, CandidateAggregator, CandidateFilters, HistorySource,
};
use super::domain::StudentProfile;
use super::estimation::{evaluate, EvaluationHints};
use super::explain::explain;
use super::ranking::{
    EvaluatedCandidate, RankedCandidate, RankingPreferences, RankingWeights, TierRanker,
    TierTargets,
};
use super::recommendation::{
    FilteredCandidate, RankedRecommendation, RecommendationDiagnostics, TieredRecommendations,
};
use super::repository::{HistoryStore, InventoryScope, InventorySource, RepositoryError};
use super::validation::{RequestError, RequestGuard};

pub const DEFAULT_HISTORY_YEARS: usize = 3;
pub const MAX_HISTORY_YEARS: usize = 5;

/// Inbound request: the student, optional filters and preferences, per-tier overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub student: StudentProfile,
    #[serde(default)]
    pub filters: CandidateFilters,
    #[serde(default)]
    pub preferences: RankingPreferences,
    #[serde(default)]
    pub rush_count: Option<usize>,
    #[serde(default)]
    pub stable_count: Option<usize>,
    #[serde(default)]
    pub safe_count: Option<usize>,
}

impl RecommendationRequest {
    pub fn for_student(student: StudentProfile) -> Self {
        Self {
            student,
            filters: CandidateFilters::default(),
            preferences: RankingPreferences::default(),
            rush_count: None,
            stable_count: None,
            safe_count: None,
        }
    }
}

/// Engine settings shared by every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorSettings {
    pub history_years: usize,
    pub tier_targets: TierTargets,
    pub weights: RankingWeights,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            history_years: DEFAULT_HISTORY_YEARS,
            tier_targets: TierTargets::default(),
            weights: RankingWeights::default(),
        }
    }
}

/// Service composing the request guard, the two stores, the estimator and the ranker.
pub struct RecommendationService<I, H> {
    guard: RequestGuard,
    inventory: Arc<I>,
    history: Arc<H>,
    ranker: TierRanker,
    history_years: usize,
}

impl<I, H> RecommendationService<I, H>
where
    I: InventorySource + 'static,
    H: HistoryStore + 'static,
{
    pub fn new(inventory: Arc<I>, history: Arc<H>, settings: AdvisorSettings) -> Self {
        let history_years = settings.history_years.clamp(1, MAX_HISTORY_YEARS);
        Self {
            guard: RequestGuard::new(settings.tier_targets),
            inventory,
            history,
            ranker: TierRanker::new(settings.weights),
            history_years,
        }
    }

    pub fn history_years(&self) -> usize {
        self.history_years
    }

    /// Produce tiered recommendations for one student.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<TieredRecommendations, RecommendationError> {
        let targets = self.guard.check(request)?;
        let student = &request.student;
        let scope = InventoryScope::for_student(student);
        let generated_at = Utc::now();

        info!(
            province = %scope.province,
            subject_category = %scope.subject_category,
            year = scope.year,
            score = student.score,
            "building recommendations"
        );

        let aggregator = CandidateAggregator::new(
            self.inventory.as_ref(),
            self.history.as_ref(),
            self.history_years,
        );
        let candidates = aggregator.aggregate(&scope, &request.filters)?;
        if candidates.is_empty() {
            info!("no candidate groups in scope");
            return Ok(TieredRecommendations::empty(generated_at));
        }

        let candidates_evaluated = candidates.len();
        let without_history = candidates
            .iter()
            .filter(|candidate| candidate.history_source == HistorySource::None)
            .count();

        let evaluated = evaluate_all(student, candidates);
        let filtered: Vec<FilteredCandidate> = evaluated
            .iter()
            .filter_map(|entry| {
                FilteredCandidate::from_result(&entry.candidate.group, &entry.result)
            })
            .collect();
        debug!(
            evaluated = candidates_evaluated,
            filtered = filtered.len(),
            without_history,
            "estimated admission probabilities"
        );

        let tiers = self.ranker.rank(evaluated, &request.preferences, &targets);
        let recommendations = TieredRecommendations::new(
            present(tiers.rush),
            present(tiers.stable),
            present(tiers.safe),
            RecommendationDiagnostics {
                candidates_evaluated,
                without_history,
                filtered,
                generated_at,
            },
        );

        info!(
            rush = recommendations.rush.len(),
            stable = recommendations.stable.len(),
            safe = recommendations.safe.len(),
            "recommendations ready"
        );
        Ok(recommendations)
    }
}

/// Runs the estimator across candidates in parallel, preserving input order.
///
/// The current plan count is only compared against an exact group match: merged series
/// carry the institution-wide intake, not this group's.
pub fn evaluate_all(
    student: &StudentProfile,
    candidates: Vec<AggregatedCandidate>,
) -> Vec<EvaluatedCandidate> {
    candidates
        .into_par_iter()
        .map(|candidate| {
            let hints = EvaluationHints {
                score_volatility: None,
                popularity: candidate.group.popularity,
                current_plan_count: (candidate.history_source == HistorySource::Exact)
                    .then(|| candidate.group.total_plan_count()),
            };
            let result = evaluate(student.score, student.rank, &candidate.series, &hints);
            EvaluatedCandidate { candidate, result }
        })
        .collect()
}

fn present(ranked: Vec<RankedCandidate>) -> Vec<RankedRecommendation> {
    ranked
        .into_iter()
        .map(|entry| {
            let history_source = entry.candidate.history_source;
            let explanation = explain(&entry.candidate.group, &entry.result, history_source);
            RankedRecommendation {
                group: entry.candidate.group,
                result: entry.result,
                rank_score: (entry.rank_score * 100.0).round() / 100.0,
                history_source,
                reasons: explanation.reasons,
                warnings: explanation.warnings,
                highlights: explanation.highlights,
            }
        })
        .collect()
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
