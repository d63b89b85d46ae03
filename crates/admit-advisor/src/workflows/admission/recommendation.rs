use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregation::HistorySource;
use super::domain::{CandidateGroup, CandidateKey, InstitutionTier, Tier};
use super::estimation::{FilterReason, ProbabilityResult};
use super::explain::{HighlightCode, ReasonCode, WarningCode};

/// One entry of a tier, with everything a presenter needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub group: CandidateGroup,
    pub result: ProbabilityResult,
    pub rank_score: f64,
    pub history_source: HistorySource,
    pub reasons: Vec<ReasonCode>,
    pub warnings: Vec<WarningCode>,
    pub highlights: Vec<HighlightCode>,
}

/// Estimate excluded from the tiers, reported for transparency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredCandidate {
    pub key: CandidateKey,
    pub institution_name: String,
    pub tier: Tier,
    pub probability: f64,
    pub score_gap: f64,
    pub reason: FilterReason,
}

impl FilteredCandidate {
    pub fn from_result(group: &CandidateGroup, result: &ProbabilityResult) -> Option<Self> {
        let reason = result.filter_reason?;
        Some(Self {
            key: group.key(),
            institution_name: group.institution.name.clone(),
            tier: result.tier,
            probability: result.probability,
            score_gap: result.score_gap,
            reason,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierSummary {
    pub count: usize,
    pub average_probability: f64,
}

impl TierSummary {
    fn from_entries(entries: &[RankedRecommendation]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let total: f64 = entries.iter().map(|entry| entry.result.probability).sum();
        let average = total / entries.len() as f64;
        Self {
            count: entries.len(),
            average_probability: (average * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub rush: TierSummary,
    pub stable: TierSummary,
    pub safe: TierSummary,
    pub institution_tiers: BTreeMap<InstitutionTier, usize>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDiagnostics {
    pub candidates_evaluated: usize,
    pub without_history: usize,
    pub filtered: Vec<FilteredCandidate>,
    pub generated_at: DateTime<Utc>,
}

impl RecommendationDiagnostics {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            candidates_evaluated: 0,
            without_history: 0,
            filtered: Vec::new(),
            generated_at,
        }
    }
}

/// Final output: three ordered tiers plus summary and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredRecommendations {
    pub rush: Vec<RankedRecommendation>,
    pub stable: Vec<RankedRecommendation>,
    pub safe: Vec<RankedRecommendation>,
    pub summary: RecommendationSummary,
    pub diagnostics: RecommendationDiagnostics,
}

impl TieredRecommendations {
    pub fn new(
        rush: Vec<RankedRecommendation>,
        stable: Vec<RankedRecommendation>,
        safe: Vec<RankedRecommendation>,
        diagnostics: RecommendationDiagnostics,
    ) -> Self {
        let summary = summarize(&rush, &stable, &safe);
        Self {
            rush,
            stable,
            safe,
            summary,
            diagnostics,
        }
    }

    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            RecommendationDiagnostics::empty(generated_at),
        )
    }

    pub fn tier(&self, tier: Tier) -> &[RankedRecommendation] {
        match tier {
            Tier::Rush => &self.rush,
            Tier::Stable => &self.stable,
            Tier::Safe => &self.safe,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

fn summarize(
    rush: &[RankedRecommendation],
    stable: &[RankedRecommendation],
    safe: &[RankedRecommendation],
) -> RecommendationSummary {
    let mut institution_tiers = BTreeMap::new();
    for entry in rush.iter().chain(stable).chain(safe) {
        *institution_tiers
            .entry(entry.group.institution_tier())
            .or_insert(0) += 1;
    }

    RecommendationSummary {
        rush: TierSummary::from_entries(rush),
        stable: TierSummary::from_entries(stable),
        safe: TierSummary::from_entries(safe),
        institution_tiers,
        total: rush.len() + stable.len() + safe.len(),
    }
}
