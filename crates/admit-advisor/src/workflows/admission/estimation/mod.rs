mod policy;
mod signals;
pub(crate) mod tables;

pub use policy::{classify_tier, FilterReason};

use super::domain::{AdjustmentRisk, HistoricalSeries, Tier};
use serde::{Deserialize, Serialize};
use tables::{
    BASE_PROBABILITY_BY_SCORE_GAP, NO_DATA_PROBABILITY, RANK_ADJUSTMENT_BY_RANK_GAP,
    VOLATILITY_FACTOR,
};

/// Optional per-candidate inputs that refine an estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationHints {
    /// Replaces the volatility computed from the series.
    pub score_volatility: Option<f64>,
    /// Popularity index on a 0..100 scale.
    pub popularity: Option<f64>,
    /// Current-year plan count, compared against last year's accepted count.
    pub current_plan_count: Option<u32>,
}

/// Admission estimate for one (student, candidate group) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub probability: f64,
    pub tier: Tier,
    pub adjustment_risk: AdjustmentRisk,
    pub score_gap: f64,
    pub rank_gap: Option<f64>,
    pub confidence: f64,
    pub filtered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_reason: Option<FilterReason>,
    pub score_volatility: f64,
    pub score_trend: f64,
    pub plan_change_rate: f64,
    pub years_of_history: usize,
}

impl ProbabilityResult {
    /// Neutral estimate used when no historical outcomes exist for a target.
    pub fn no_data() -> Self {
        Self {
            probability: NO_DATA_PROBABILITY,
            tier: Tier::Stable,
            adjustment_risk: AdjustmentRisk::Medium,
            score_gap: 0.0,
            rank_gap: None,
            confidence: 0.0,
            filtered: false,
            filter_reason: None,
            score_volatility: 0.0,
            score_trend: 0.0,
            plan_change_rate: 0.0,
            years_of_history: 0,
        }
    }
}

/// Estimates the admission probability for a student against a historical series.
///
/// Pure and deterministic: identical inputs always produce identical results.
pub fn evaluate(
    score: u32,
    rank: Option<u32>,
    series: &HistoricalSeries,
    hints: &EvaluationHints,
) -> ProbabilityResult {
    if series.is_empty() {
        return ProbabilityResult::no_data();
    }

    let signals = signals::derive_signals(score, rank, series, hints);

    let base = BASE_PROBABILITY_BY_SCORE_GAP.lookup(signals.score_gap);
    let rank_adjustment = signals
        .rank_gap
        .map(|gap| RANK_ADJUSTMENT_BY_RANK_GAP.lookup(gap))
        .unwrap_or(0.0);
    let adjusted = base
        + rank_adjustment
        + signals::trend_adjustment(signals.score_trend)
        + signals::plan_change_adjustment(signals.plan_change_rate)
        + signals::popularity_adjustment(hints.popularity);

    let dampened = adjusted * VOLATILITY_FACTOR.lookup(signals.score_volatility);
    let probability = round_tenth(dampened.clamp(0.0, 100.0));
    let confidence = round_tenth(policy::confidence(&signals));

    let filter_reason = policy::screen(signals.score_gap, probability);
    let (tier, adjustment_risk) = match filter_reason {
        Some(reason) => {
            let tier = reason.reported_tier();
            let risk = match tier {
                Tier::Safe => AdjustmentRisk::Low,
                _ => AdjustmentRisk::High,
            };
            (tier, risk)
        }
        None => classify_tier(probability),
    };

    ProbabilityResult {
        probability,
        tier,
        adjustment_risk,
        score_gap: signals.score_gap,
        rank_gap: signals.rank_gap,
        confidence,
        filtered: filter_reason.is_some(),
        filter_reason,
        score_volatility: signals.score_volatility,
        score_trend: signals.score_trend,
        plan_change_rate: signals.plan_change_rate,
        years_of_history: signals.years,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
