use super::super::domain::HistoricalSeries;
use super::tables::{
    PLAN_CONTRACTION, PLAN_CONTRACTION_ADJUSTMENT, PLAN_EXPANSION, PLAN_EXPANSION_ADJUSTMENT,
    PLAN_STRONG_CONTRACTION, PLAN_STRONG_CONTRACTION_ADJUSTMENT, PLAN_STRONG_EXPANSION,
    PLAN_STRONG_EXPANSION_ADJUSTMENT, POPULARITY_COLD, POPULARITY_COLD_ADJUSTMENT,
    POPULARITY_HOT, POPULARITY_HOT_ADJUSTMENT, POPULARITY_WARM, POPULARITY_WARM_ADJUSTMENT,
    TREND_DROP, TREND_DROP_ADJUSTMENT, TREND_RISE, TREND_RISE_ADJUSTMENT, TREND_SHARP_DROP,
    TREND_SHARP_DROP_ADJUSTMENT, TREND_SHARP_RISE, TREND_SHARP_RISE_ADJUSTMENT,
};
use super::EvaluationHints;

/// Statistics derived from a non-empty series and the student's standing against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SeriesSignals {
    pub avg_min_score: f64,
    pub score_gap: f64,
    pub score_volatility: f64,
    pub score_trend: f64,
    pub rank_gap: Option<f64>,
    pub plan_change_rate: f64,
    pub years: usize,
}

pub(crate) fn derive_signals(
    score: u32,
    rank: Option<u32>,
    series: &HistoricalSeries,
    hints: &EvaluationHints,
) -> SeriesSignals {
    let records = series.records();
    let min_scores: Vec<f64> = records.iter().map(|record| record.min_score).collect();

    let avg_min_score = mean(&min_scores).unwrap_or(0.0);
    let score_gap = f64::from(score) - avg_min_score;

    let score_volatility = hints
        .score_volatility
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or_else(|| population_std_dev(&min_scores, avg_min_score));

    let score_trend = match records {
        [latest, previous, ..] => latest.min_score - previous.min_score,
        _ => 0.0,
    };

    let min_ranks: Vec<f64> = records
        .iter()
        .filter_map(|record| record.min_rank)
        .map(f64::from)
        .collect();
    let rank_gap = match (rank, mean(&min_ranks)) {
        (Some(rank), Some(avg_min_rank)) => Some(avg_min_rank - f64::from(rank)),
        _ => None,
    };

    let prior_plan = series.latest().and_then(|record| record.accepted_count);
    let plan_change_rate = match (hints.current_plan_count, prior_plan) {
        (Some(current), Some(prior)) if prior > 0 => {
            (f64::from(current) - f64::from(prior)) / f64::from(prior)
        }
        _ => 0.0,
    };

    SeriesSignals {
        avg_min_score,
        score_gap,
        score_volatility,
        score_trend,
        rank_gap,
        plan_change_rate,
        years: records.len(),
    }
}

pub(crate) fn trend_adjustment(score_trend: f64) -> f64 {
    if score_trend >= TREND_SHARP_RISE {
        TREND_SHARP_RISE_ADJUSTMENT
    } else if score_trend >= TREND_RISE {
        TREND_RISE_ADJUSTMENT
    } else if score_trend <= TREND_SHARP_DROP {
        TREND_SHARP_DROP_ADJUSTMENT
    } else if score_trend <= TREND_DROP {
        TREND_DROP_ADJUSTMENT
    } else {
        0.0
    }
}

pub(crate) fn plan_change_adjustment(plan_change_rate: f64) -> f64 {
    if plan_change_rate >= PLAN_STRONG_EXPANSION {
        PLAN_STRONG_EXPANSION_ADJUSTMENT
    } else if plan_change_rate >= PLAN_EXPANSION {
        PLAN_EXPANSION_ADJUSTMENT
    } else if plan_change_rate <= PLAN_STRONG_CONTRACTION {
        PLAN_STRONG_CONTRACTION_ADJUSTMENT
    } else if plan_change_rate <= PLAN_CONTRACTION {
        PLAN_CONTRACTION_ADJUSTMENT
    } else {
        0.0
    }
}

pub(crate) fn popularity_adjustment(popularity: Option<f64>) -> f64 {
    match popularity {
        Some(value) if value >= POPULARITY_HOT => POPULARITY_HOT_ADJUSTMENT,
        Some(value) if value >= POPULARITY_WARM => POPULARITY_WARM_ADJUSTMENT,
        Some(value) if value <= POPULARITY_COLD => POPULARITY_COLD_ADJUSTMENT,
        _ => 0.0,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}
