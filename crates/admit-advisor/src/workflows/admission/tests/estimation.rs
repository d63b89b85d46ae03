use super::common::*;
use crate::workflows::admission::domain::{AdjustmentRisk, HistoricalSeries, Tier};
use crate::workflows::admission::estimation::{evaluate, EvaluationHints, FilterReason};

fn with_ranks(min_score: f64, min_rank: u32) -> HistoricalSeries {
    let records = (1..=3)
        .map(|offset| {
            let mut record = year(TARGET_YEAR - offset, min_score);
            record.min_rank = Some(min_rank);
            record
        })
        .collect();
    HistoricalSeries::from_records(records, 3)
}

#[test]
fn well_above_cutoff_lands_in_safe() {
    let result = evaluate(625, None, &flat_series(600.0), &EvaluationHints::default());

    assert_eq!(result.score_gap, 25.0);
    assert_eq!(result.probability, 99.0);
    assert_eq!(result.tier, Tier::Safe);
    assert_eq!(result.adjustment_risk, AdjustmentRisk::Low);
    assert_eq!(result.confidence, 100.0);
    assert!(!result.filtered);
    assert_eq!(result.years_of_history, 3);
}

#[test]
fn gap_of_exactly_minus_thirty_is_filtered_as_negligible() {
    let result = evaluate(570, None, &flat_series(600.0), &EvaluationHints::default());

    assert_eq!(result.score_gap, -30.0);
    assert_eq!(result.probability, 3.0);
    assert!(result.filtered);
    assert_eq!(
        result.filter_reason,
        Some(FilterReason::NegligibleProbability)
    );
    assert_eq!(result.tier, Tier::Rush);
    assert_eq!(result.adjustment_risk, AdjustmentRisk::High);
}

#[test]
fn gap_of_minus_thirty_survives_with_a_strong_rank_lead() {
    let result = evaluate(
        570,
        Some(12000),
        &with_ranks(600.0, 17000),
        &EvaluationHints::default(),
    );

    assert_eq!(result.score_gap, -30.0);
    assert_eq!(result.rank_gap, Some(5000.0));
    assert_eq!(result.probability, 15.0);
    assert!(!result.filtered);
    assert_eq!(result.filter_reason, None);
    assert_eq!(result.tier, Tier::Rush);
    assert_eq!(result.adjustment_risk, AdjustmentRisk::Medium);
    assert_eq!(result.confidence, 85.0);
}

#[test]
fn hopeless_rush_is_filtered() {
    let result = evaluate(569, None, &flat_series(600.0), &EvaluationHints::default());

    assert!(result.filtered);
    assert_eq!(result.filter_reason, Some(FilterReason::RushGapTooLarge));
    assert_eq!(result.tier, Tier::Rush);
}

#[test]
fn wasted_safe_is_filtered() {
    let result = evaluate(626, None, &flat_series(600.0), &EvaluationHints::default());

    assert!(result.filtered);
    assert_eq!(result.filter_reason, Some(FilterReason::SafeGapTooLarge));
    assert_eq!(result.tier, Tier::Safe);
    assert_eq!(result.adjustment_risk, AdjustmentRisk::Low);
}

#[test]
fn empty_series_yields_neutral_estimate() {
    let result = evaluate(
        640,
        Some(1200),
        &HistoricalSeries::empty(),
        &EvaluationHints::default(),
    );

    assert_eq!(result.probability, 50.0);
    assert_eq!(result.tier, Tier::Stable);
    assert_eq!(result.adjustment_risk, AdjustmentRisk::Medium);
    assert_eq!(result.confidence, 0.0);
    assert!(!result.filtered);
    assert_eq!(result.years_of_history, 0);
}

#[test]
fn rank_ahead_of_cutoff_raises_probability() {
    let result = evaluate(605, Some(7000), &with_ranks(600.0, 10000), &EvaluationHints::default());

    assert_eq!(result.rank_gap, Some(3000.0));
    assert_eq!(result.probability, 82.0);
    assert_eq!(result.confidence, 100.0);
}

#[test]
fn conflicting_rank_lowers_probability_and_confidence() {
    let result = evaluate(
        605,
        Some(12000),
        &with_ranks(600.0, 10000),
        &EvaluationHints::default(),
    );

    assert_eq!(result.rank_gap, Some(-2000.0));
    assert_eq!(result.probability, 68.0);
    assert_eq!(result.confidence, 85.0);
}

#[test]
fn rising_volatile_cutoff_is_dampened() {
    let result = evaluate(610, None, &series([610.0, 598.0, 592.0]), &EvaluationHints::default());

    assert_eq!(result.score_gap, 10.0);
    assert_eq!(result.score_trend, 12.0);
    assert!(result.score_volatility > 6.0 && result.score_volatility < 10.0);
    assert_eq!(result.probability, 71.4);
    assert_eq!(result.confidence, 90.0);
    assert_eq!(result.tier, Tier::Stable);
}

#[test]
fn expanding_intake_and_popularity_shift_estimate() {
    let mut records: Vec<_> = flat_series(600.0).records().to_vec();
    records[0].accepted_count = Some(50);
    let history = HistoricalSeries::from_records(records, 3);

    let expanding = EvaluationHints {
        current_plan_count: Some(60),
        ..EvaluationHints::default()
    };
    let result = evaluate(600, None, &history, &expanding);
    assert_eq!(result.plan_change_rate, 0.2);
    assert_eq!(result.probability, 70.0);

    let crowded = EvaluationHints {
        popularity: Some(85.0),
        ..EvaluationHints::default()
    };
    let result = evaluate(600, None, &history, &crowded);
    assert_eq!(result.probability, 57.0);
}

#[test]
fn volatility_hint_overrides_series() {
    let hints = EvaluationHints {
        score_volatility: Some(16.0),
        ..EvaluationHints::default()
    };
    let result = evaluate(610, None, &flat_series(600.0), &hints);

    assert_eq!(result.score_volatility, 16.0);
    assert_eq!(result.probability, 69.7);
    assert_eq!(result.confidence, 80.0);
}

#[test]
fn evaluate_is_idempotent() {
    let history = series([612.0, 605.0, 598.0]);
    let hints = EvaluationHints {
        popularity: Some(65.0),
        current_plan_count: Some(40),
        score_volatility: None,
    };

    let first = evaluate(603, Some(15000), &history, &hints);
    let second = evaluate(603, Some(15000), &history, &hints);
    assert_eq!(first, second);
}

#[test]
fn probability_never_decreases_with_score() {
    let history = series([612.0, 605.0, 598.0]);
    let hints = EvaluationHints::default();

    let mut previous = 0.0;
    for score in 500..=720 {
        let result = evaluate(score, None, &history, &hints);
        assert!(
            result.probability >= previous,
            "probability dropped at score {score}"
        );
        assert!((0.0..=100.0).contains(&result.probability));
        previous = result.probability;
    }
}

#[test]
fn short_history_reduces_confidence() {
    let history = HistoricalSeries::from_records(vec![year(2024, 600.0)], 3);
    let result = evaluate(610, None, &history, &EvaluationHints::default());

    assert_eq!(result.years_of_history, 1);
    assert_eq!(result.confidence, 70.0);
    assert_eq!(result.score_trend, 0.0);
}
