mod weights;

pub use weights::{
    RankingPreferences, RankingWeights, TierTargets, DEFAULT_RUSH_COUNT, DEFAULT_SAFE_COUNT,
    DEFAULT_STABLE_COUNT,
};

use std::cmp::Ordering;

use tracing::debug;

use super::aggregation::AggregatedCandidate;
use super::domain::{CandidateGroup, Tier};
use super::estimation::ProbabilityResult;
use weights::{
    ideal_probability, institution_share, EMPLOYABILITY_DEFAULT_SHARE, LOCATION_MATCH_SHARE,
    LOCATION_UNSPECIFIED_SHARE, PREFERENCE_FULL_SHARE, PREFERENCE_PARTIAL_SHARE,
    PREFERENCE_UNSPECIFIED_SHARE, PROBABILITY_CLOSENESS_SPAN,
};

/// A candidate with its estimate, ready for tiering.
#[derive(Debug, Clone)]
pub struct EvaluatedCandidate {
    pub candidate: AggregatedCandidate,
    pub result: ProbabilityResult,
}

#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub candidate: AggregatedCandidate,
    pub result: ProbabilityResult,
    pub rank_score: f64,
}

/// Ordered, truncated buckets per tier.
#[derive(Debug, Clone, Default)]
pub struct RankedTiers {
    pub rush: Vec<RankedCandidate>,
    pub stable: Vec<RankedCandidate>,
    pub safe: Vec<RankedCandidate>,
}

impl RankedTiers {
    fn bucket_mut(&mut self, tier: Tier) -> &mut Vec<RankedCandidate> {
        match tier {
            Tier::Rush => &mut self.rush,
            Tier::Stable => &mut self.stable,
            Tier::Safe => &mut self.safe,
        }
    }
}

/// Stateless ranker applying weights and preferences within each tier.
#[derive(Debug, Clone, Default)]
pub struct TierRanker {
    weights: RankingWeights,
}

impl TierRanker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Partitions by tier, sorts each bucket by rank score and truncates to the targets.
    /// Filtered estimates never enter a bucket; under-filled buckets are returned as is.
    pub fn rank(
        &self,
        evaluated: Vec<EvaluatedCandidate>,
        preferences: &RankingPreferences,
        targets: &TierTargets,
    ) -> RankedTiers {
        let mut tiers = RankedTiers::default();
        let mut skipped = 0usize;

        for EvaluatedCandidate { candidate, result } in evaluated {
            if result.filtered {
                skipped += 1;
                continue;
            }
            let rank_score = self.rank_score(&candidate.group, &result, preferences);
            tiers.bucket_mut(result.tier).push(RankedCandidate {
                candidate,
                result,
                rank_score,
            });
        }

        if skipped > 0 {
            debug!(skipped, "filtered estimates excluded from tiers");
        }

        for tier in Tier::ordered() {
            let bucket = tiers.bucket_mut(tier);
            bucket.sort_by(compare_ranked);
            bucket.truncate(targets.for_tier(tier));
        }

        tiers
    }

    pub fn rank_score(
        &self,
        group: &CandidateGroup,
        result: &ProbabilityResult,
        preferences: &RankingPreferences,
    ) -> f64 {
        let weights = &self.weights;

        let institution =
            weights.college_level_weight * institution_share(group.institution_tier());
        let preference = weights.preference_weight * preference_share(group, preferences);
        let location = weights.location_weight * location_share(group, preferences);
        let employability = weights.employability_weight * EMPLOYABILITY_DEFAULT_SHARE;
        let closeness = weights.probability_weight * closeness_share(result);
        let confidence = weights.confidence_weight * (result.confidence / 100.0);

        institution + preference + location + employability + closeness + confidence
    }
}

fn compare_ranked(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.rank_score
        .total_cmp(&a.rank_score)
        .then_with(|| {
            b.candidate
                .group
                .institution_tier()
                .cmp(&a.candidate.group.institution_tier())
        })
        .then_with(|| a.result.score_gap.abs().total_cmp(&b.result.score_gap.abs()))
        .then_with(|| a.candidate.group.key().cmp(&b.candidate.group.key()))
}

fn normalized(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

fn preference_share(group: &CandidateGroup, preferences: &RankingPreferences) -> f64 {
    let majors = normalized(&preferences.preferred_majors);
    let categories = normalized(&preferences.preferred_categories);
    if majors.is_empty() && categories.is_empty() {
        return PREFERENCE_UNSPECIFIED_SHARE;
    }

    let offered: Vec<(String, Option<String>)> = group
        .majors
        .iter()
        .map(|major| {
            (
                major.name.trim().to_lowercase(),
                major.category.as_deref().map(|c| c.trim().to_lowercase()),
            )
        })
        .collect();

    let full = offered.iter().any(|(name, category)| {
        majors.iter().any(|wanted| wanted == name)
            || category
                .as_ref()
                .map(|category| categories.iter().any(|wanted| wanted == category))
                .unwrap_or(false)
    });
    if full {
        return PREFERENCE_FULL_SHARE;
    }

    let related =
        |a: &str, b: &str| !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a));
    let partial = offered.iter().any(|(name, category)| {
        majors.iter().any(|wanted| related(name, wanted))
            || category
                .as_ref()
                .map(|category| categories.iter().any(|wanted| related(category, wanted)))
                .unwrap_or(false)
    });
    if partial {
        PREFERENCE_PARTIAL_SHARE
    } else {
        0.0
    }
}

fn location_share(group: &CandidateGroup, preferences: &RankingPreferences) -> f64 {
    let provinces = normalized(&preferences.preferred_provinces);
    if provinces.is_empty() {
        return LOCATION_UNSPECIFIED_SHARE;
    }
    let province = group.institution.province.trim().to_lowercase();
    if provinces.iter().any(|wanted| *wanted == province) {
        LOCATION_MATCH_SHARE
    } else {
        0.0
    }
}

fn closeness_share(result: &ProbabilityResult) -> f64 {
    let distance = (result.probability - ideal_probability(result.tier)).abs();
    (1.0 - distance / PROBABILITY_CLOSENESS_SPAN).max(0.0)
}
