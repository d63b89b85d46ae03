use super::super::domain::{AdjustmentRisk, Tier};
use super::signals::SeriesSignals;
use super::tables::{
    CONFIDENCE_ELEVATED_VOLATILITY, CONFIDENCE_ELEVATED_VOLATILITY_PENALTY,
    CONFIDENCE_FULL_HISTORY_YEARS, CONFIDENCE_HIGH_VOLATILITY, CONFIDENCE_HIGH_VOLATILITY_PENALTY,
    CONFIDENCE_PER_MISSING_YEAR, CONFIDENCE_PLAN_SWING, CONFIDENCE_PLAN_SWING_PENALTY,
    CONFIDENCE_SIGN_CONFLICT_PENALTY, FILTER_NEGLIGIBLE_GAP, FILTER_NEGLIGIBLE_PROBABILITY,
    FILTER_RUSH_GAP, FILTER_SAFE_GAP, RUSH_CEILING, RUSH_HIGH_RISK_CEILING,
    RUSH_MEDIUM_RISK_CEILING, STABLE_CEILING, STABLE_MEDIUM_RISK_CEILING,
};
use serde::{Deserialize, Serialize};

/// Why a computable estimate was excluded from the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterReason {
    RushGapTooLarge,
    SafeGapTooLarge,
    NegligibleProbability,
}

impl FilterReason {
    pub const fn summary(self) -> &'static str {
        match self {
            FilterReason::RushGapTooLarge => "gap too large, rush is pointless",
            FilterReason::SafeGapTooLarge => "gap too large, wastes a safe slot",
            FilterReason::NegligibleProbability => "probability negligible and gap extreme",
        }
    }

    /// Tier reported alongside a filtered estimate.
    pub const fn reported_tier(self) -> Tier {
        match self {
            FilterReason::SafeGapTooLarge => Tier::Safe,
            FilterReason::RushGapTooLarge | FilterReason::NegligibleProbability => Tier::Rush,
        }
    }
}

/// Assigns a tier and the matching adjustment risk. Total over every probability value.
pub fn classify_tier(probability: f64) -> (Tier, AdjustmentRisk) {
    if probability < RUSH_CEILING {
        let risk = if probability < RUSH_HIGH_RISK_CEILING {
            AdjustmentRisk::High
        } else if probability < RUSH_MEDIUM_RISK_CEILING {
            AdjustmentRisk::Medium
        } else {
            AdjustmentRisk::Low
        };
        (Tier::Rush, risk)
    } else if probability <= STABLE_CEILING {
        let risk = if probability < STABLE_MEDIUM_RISK_CEILING {
            AdjustmentRisk::Medium
        } else {
            AdjustmentRisk::Low
        };
        (Tier::Stable, risk)
    } else {
        (Tier::Safe, AdjustmentRisk::Low)
    }
}

pub(crate) fn screen(score_gap: f64, probability: f64) -> Option<FilterReason> {
    if score_gap < FILTER_RUSH_GAP {
        return Some(FilterReason::RushGapTooLarge);
    }
    if score_gap > FILTER_SAFE_GAP {
        return Some(FilterReason::SafeGapTooLarge);
    }
    if probability < FILTER_NEGLIGIBLE_PROBABILITY && score_gap < FILTER_NEGLIGIBLE_GAP {
        return Some(FilterReason::NegligibleProbability);
    }
    None
}

pub(crate) fn confidence(signals: &SeriesSignals) -> f64 {
    let mut confidence: f64 = 100.0;

    let missing_years = CONFIDENCE_FULL_HISTORY_YEARS.saturating_sub(signals.years);
    confidence -= CONFIDENCE_PER_MISSING_YEAR * missing_years as f64;

    if signals.score_volatility > CONFIDENCE_HIGH_VOLATILITY {
        confidence -= CONFIDENCE_HIGH_VOLATILITY_PENALTY;
    } else if signals.score_volatility > CONFIDENCE_ELEVATED_VOLATILITY {
        confidence -= CONFIDENCE_ELEVATED_VOLATILITY_PENALTY;
    }

    if let Some(rank_gap) = signals.rank_gap {
        let conflicting = (signals.score_gap > 0.0 && rank_gap < 0.0)
            || (signals.score_gap < 0.0 && rank_gap > 0.0);
        if conflicting {
            confidence -= CONFIDENCE_SIGN_CONFLICT_PENALTY;
        }
    }

    if signals.plan_change_rate.abs() >= CONFIDENCE_PLAN_SWING {
        confidence -= CONFIDENCE_PLAN_SWING_PENALTY;
    }

    confidence.clamp(0.0, 100.0)
}
