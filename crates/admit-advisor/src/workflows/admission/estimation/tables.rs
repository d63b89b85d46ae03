//! Frozen heuristic tables and thresholds used by the estimator.
//!
//! Every step table is ordered from the highest boundary down; the first edge that admits
//! the input wins and `otherwise` covers everything below the last edge.

/// Lower edge of a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Edge {
    AtLeast(f64),
    Above(f64),
}

impl Edge {
    const fn bound(self) -> f64 {
        match self {
            Edge::AtLeast(bound) | Edge::Above(bound) => bound,
        }
    }

    fn admits(self, value: f64) -> bool {
        match self {
            Edge::AtLeast(bound) => value >= bound,
            Edge::Above(bound) => value > bound,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StepTable<const N: usize> {
    pub(crate) steps: [(Edge, f64); N],
    pub(crate) otherwise: f64,
}

impl<const N: usize> StepTable<N> {
    pub(crate) fn lookup(&self, value: f64) -> f64 {
        self.steps
            .iter()
            .find(|(edge, _)| edge.admits(value))
            .map(|(_, output)| *output)
            .unwrap_or(self.otherwise)
    }

    /// Boundaries in table order, for exhaustive tests.
    pub(crate) fn boundaries(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().map(|(edge, _)| edge.bound())
    }
}

/// Base admission probability by score gap (student score minus average cutoff).
pub(crate) const BASE_PROBABILITY_BY_SCORE_GAP: StepTable<10> = StepTable {
    steps: [
        (Edge::AtLeast(25.0), 99.0),
        (Edge::AtLeast(20.0), 95.0),
        (Edge::AtLeast(15.0), 90.0),
        (Edge::AtLeast(10.0), 82.0),
        (Edge::AtLeast(5.0), 74.0),
        (Edge::AtLeast(0.0), 65.0),
        (Edge::AtLeast(-5.0), 50.0),
        (Edge::AtLeast(-10.0), 35.0),
        (Edge::AtLeast(-15.0), 20.0),
        (Edge::Above(-20.0), 10.0),
    ],
    otherwise: 3.0,
};

/// Additive correction by rank gap (historical average cutoff rank minus student rank).
pub(crate) const RANK_ADJUSTMENT_BY_RANK_GAP: StepTable<7> = StepTable {
    steps: [
        (Edge::AtLeast(5000.0), 12.0),
        (Edge::AtLeast(2000.0), 8.0),
        (Edge::AtLeast(500.0), 4.0),
        (Edge::AtLeast(0.0), 0.0),
        (Edge::AtLeast(-500.0), -3.0),
        (Edge::AtLeast(-2000.0), -6.0),
        (Edge::AtLeast(-5000.0), -9.0),
    ],
    otherwise: -12.0,
};

/// Multiplicative dampening by cutoff volatility (population std-dev of minimum scores).
pub(crate) const VOLATILITY_FACTOR: StepTable<4> = StepTable {
    steps: [
        (Edge::Above(15.0), 0.85),
        (Edge::Above(10.0), 0.90),
        (Edge::Above(6.0), 0.94),
        (Edge::Above(3.0), 0.97),
    ],
    otherwise: 1.0,
};

// Cutoff trend: latest minimum score minus the previous year's. A rising cutoff is harder.
pub(crate) const TREND_SHARP_RISE: f64 = 10.0;
pub(crate) const TREND_SHARP_RISE_ADJUSTMENT: f64 = -6.0;
pub(crate) const TREND_RISE: f64 = 5.0;
pub(crate) const TREND_RISE_ADJUSTMENT: f64 = -3.0;
pub(crate) const TREND_SHARP_DROP: f64 = -10.0;
pub(crate) const TREND_SHARP_DROP_ADJUSTMENT: f64 = 6.0;
pub(crate) const TREND_DROP: f64 = -5.0;
pub(crate) const TREND_DROP_ADJUSTMENT: f64 = 3.0;

// Plan-count change rate against last year's intake.
pub(crate) const PLAN_STRONG_EXPANSION: f64 = 0.20;
pub(crate) const PLAN_STRONG_EXPANSION_ADJUSTMENT: f64 = 5.0;
pub(crate) const PLAN_EXPANSION: f64 = 0.10;
pub(crate) const PLAN_EXPANSION_ADJUSTMENT: f64 = 2.0;
pub(crate) const PLAN_STRONG_CONTRACTION: f64 = -0.20;
pub(crate) const PLAN_STRONG_CONTRACTION_ADJUSTMENT: f64 = -5.0;
pub(crate) const PLAN_CONTRACTION: f64 = -0.10;
pub(crate) const PLAN_CONTRACTION_ADJUSTMENT: f64 = -2.0;

// Popularity hint on a 0..100 scale.
pub(crate) const POPULARITY_HOT: f64 = 80.0;
pub(crate) const POPULARITY_HOT_ADJUSTMENT: f64 = -8.0;
pub(crate) const POPULARITY_WARM: f64 = 60.0;
pub(crate) const POPULARITY_WARM_ADJUSTMENT: f64 = -4.0;
pub(crate) const POPULARITY_COLD: f64 = 20.0;
pub(crate) const POPULARITY_COLD_ADJUSTMENT: f64 = 4.0;

// Confidence deductions.
pub(crate) const CONFIDENCE_FULL_HISTORY_YEARS: usize = 3;
pub(crate) const CONFIDENCE_PER_MISSING_YEAR: f64 = 15.0;
pub(crate) const CONFIDENCE_HIGH_VOLATILITY: f64 = 10.0;
pub(crate) const CONFIDENCE_HIGH_VOLATILITY_PENALTY: f64 = 20.0;
pub(crate) const CONFIDENCE_ELEVATED_VOLATILITY: f64 = 6.0;
pub(crate) const CONFIDENCE_ELEVATED_VOLATILITY_PENALTY: f64 = 10.0;
pub(crate) const CONFIDENCE_SIGN_CONFLICT_PENALTY: f64 = 15.0;
pub(crate) const CONFIDENCE_PLAN_SWING: f64 = 0.30;
pub(crate) const CONFIDENCE_PLAN_SWING_PENALTY: f64 = 10.0;

// Degenerate-recommendation filter.
pub(crate) const FILTER_RUSH_GAP: f64 = -30.0;
pub(crate) const FILTER_SAFE_GAP: f64 = 25.0;
pub(crate) const FILTER_NEGLIGIBLE_PROBABILITY: f64 = 5.0;
pub(crate) const FILTER_NEGLIGIBLE_GAP: f64 = -15.0;

// Tier cut points.
pub(crate) const RUSH_CEILING: f64 = 35.0;
pub(crate) const STABLE_CEILING: f64 = 90.0;
pub(crate) const RUSH_HIGH_RISK_CEILING: f64 = 15.0;
pub(crate) const RUSH_MEDIUM_RISK_CEILING: f64 = 25.0;
pub(crate) const STABLE_MEDIUM_RISK_CEILING: f64 = 50.0;

// Neutral default when no history exists.
pub(crate) const NO_DATA_PROBABILITY: f64 = 50.0;
