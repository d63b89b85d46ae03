//! Admission-probability estimation and tiered recommendations.
//!
//! A request flows through validation, candidate aggregation (one inventory fetch, one bulk
//! history fetch), the per-candidate estimator, the tier ranker and the explanation step.

pub mod aggregation;
pub mod domain;
pub mod estimation;
pub(crate) mod explain;
pub mod ranking;
pub mod recommendation;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use aggregation::{AggregatedCandidate, CandidateAggregator, CandidateFilters, HistorySource};
pub use domain::{
    AdjustmentRisk, CandidateGroup, CandidateKey, GroupIdentity, HistoricalRecord,
    HistoricalSeries, HistoricalYearRecord, InstitutionIdentity, InstitutionTags,
    InstitutionTier, InventoryRow, MajorOffering, StudentProfile, Tier,
};
pub use estimation::{classify_tier, evaluate, EvaluationHints, FilterReason, ProbabilityResult};
pub use explain::{explain, Explanation, HighlightCode, ReasonCode, WarningCode};
pub use ranking::{
    EvaluatedCandidate, RankedCandidate, RankedTiers, RankingPreferences, RankingWeights,
    TierRanker, TierTargets,
};
pub use recommendation::{
    FilteredCandidate, RankedRecommendation, RecommendationDiagnostics, RecommendationSummary,
    TierSummary, TieredRecommendations,
};
pub use repository::{HistoryQuery, HistoryStore, InventoryScope, InventorySource, RepositoryError};
pub use router::recommendation_router;
pub use service::{
    evaluate_all, AdvisorSettings, RecommendationError, RecommendationRequest, RecommendationService,
    DEFAULT_HISTORY_YEARS, MAX_HISTORY_YEARS,
};
pub use validation::{RequestError, RequestGuard, MAX_TIER_COUNT};
