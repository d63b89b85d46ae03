use serde::{Deserialize, Serialize};

use super::aggregation::HistorySource;
use super::domain::{AdjustmentRisk, CandidateGroup, InstitutionTier, Tier};
use super::estimation::ProbabilityResult;

const SCORE_WELL_ABOVE: f64 = 15.0;
const SCORE_ABOVE: f64 = 5.0;
const SCORE_BELOW: f64 = -5.0;
const SCORE_WELL_BELOW: f64 = -15.0;
const RANK_WELL_AHEAD: f64 = 2000.0;
const RANK_WELL_BEHIND: f64 = -2000.0;
const PROBABILITY_HIGH: f64 = 80.0;
const PROBABILITY_MODERATE: f64 = 50.0;
const PROBABILITY_LOW: f64 = 25.0;

const LOW_CONFIDENCE: f64 = 60.0;
const HIGH_VOLATILITY: f64 = 10.0;
const FEW_MAJORS: usize = 2;
const LONG_SHOT_PROBABILITY: f64 = 20.0;

const MANY_MAJORS: usize = 10;
const LARGE_INTAKE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ScoreWellAbove,
    ScoreAbove,
    ScoreNearCutoff,
    ScoreBelow,
    ScoreWellBelow,
    RankWellAhead,
    RankAhead,
    RankBehind,
    RankWellBehind,
    TopTierInstitution,
    NextTierInstitution,
    RecognizedInstitution,
    ProbabilityHigh,
    ProbabilityModerate,
    ProbabilityLow,
    ProbabilityVeryLow,
    InstitutionLevelHistory,
    NoHistoricalData,
}

impl ReasonCode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ScoreWellAbove => "score well above the historical cutoff",
            Self::ScoreAbove => "score above the historical cutoff",
            Self::ScoreNearCutoff => "score close to the historical cutoff",
            Self::ScoreBelow => "score below the historical cutoff",
            Self::ScoreWellBelow => "score well below the historical cutoff",
            Self::RankWellAhead => "rank well ahead of the historical cutoff rank",
            Self::RankAhead => "rank ahead of the historical cutoff rank",
            Self::RankBehind => "rank behind the historical cutoff rank",
            Self::RankWellBehind => "rank well behind the historical cutoff rank",
            Self::TopTierInstitution => "985 institution",
            Self::NextTierInstitution => "211 institution",
            Self::RecognizedInstitution => "double first-class institution",
            Self::ProbabilityHigh => "high admission probability",
            Self::ProbabilityModerate => "moderate admission probability",
            Self::ProbabilityLow => "low admission probability",
            Self::ProbabilityVeryLow => "very low admission probability",
            Self::InstitutionLevelHistory => "estimated from institution-level history",
            Self::NoHistoricalData => "no historical admission data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    LowConfidence,
    HighAdjustmentRisk,
    HighVolatility,
    FewMajors,
    LongShot,
}

impl WarningCode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowConfidence => "estimate has low confidence",
            Self::HighAdjustmentRisk => "high risk of major reassignment",
            Self::HighVolatility => "cutoff scores fluctuate strongly year to year",
            Self::FewMajors => "group offers very few majors",
            Self::LongShot => "long shot even for a rush pick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCode {
    Tier985,
    Tier211,
    DoubleFirstClass,
    ManyMajors,
    LargeIntake,
}

impl HighlightCode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier985 => "985",
            Self::Tier211 => "211",
            Self::DoubleFirstClass => "double first-class",
            Self::ManyMajors => "wide choice of majors",
            Self::LargeIntake => "large intake",
        }
    }
}

/// Structured explanation attached to a recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub reasons: Vec<ReasonCode>,
    pub warnings: Vec<WarningCode>,
    pub highlights: Vec<HighlightCode>,
}

pub fn explain(
    group: &CandidateGroup,
    result: &ProbabilityResult,
    history_source: HistorySource,
) -> Explanation {
    Explanation {
        reasons: reasons(group, result, history_source),
        warnings: warnings(group, result),
        highlights: highlights(group),
    }
}

fn reasons(
    group: &CandidateGroup,
    result: &ProbabilityResult,
    history_source: HistorySource,
) -> Vec<ReasonCode> {
    let mut reasons = Vec::new();

    if history_source == HistorySource::None {
        reasons.push(ReasonCode::NoHistoricalData);
    } else {
        let gap = result.score_gap;
        reasons.push(if gap >= SCORE_WELL_ABOVE {
            ReasonCode::ScoreWellAbove
        } else if gap >= SCORE_ABOVE {
            ReasonCode::ScoreAbove
        } else if gap > SCORE_BELOW {
            ReasonCode::ScoreNearCutoff
        } else if gap > SCORE_WELL_BELOW {
            ReasonCode::ScoreBelow
        } else {
            ReasonCode::ScoreWellBelow
        });

        if let Some(rank_gap) = result.rank_gap {
            reasons.push(if rank_gap >= RANK_WELL_AHEAD {
                ReasonCode::RankWellAhead
            } else if rank_gap >= 0.0 {
                ReasonCode::RankAhead
            } else if rank_gap > RANK_WELL_BEHIND {
                ReasonCode::RankBehind
            } else {
                ReasonCode::RankWellBehind
            });
        }
    }

    match group.institution_tier() {
        InstitutionTier::Top => reasons.push(ReasonCode::TopTierInstitution),
        InstitutionTier::Next => reasons.push(ReasonCode::NextTierInstitution),
        InstitutionTier::Recognized => reasons.push(ReasonCode::RecognizedInstitution),
        InstitutionTier::Regular => {}
    }

    let probability = result.probability;
    reasons.push(if probability >= PROBABILITY_HIGH {
        ReasonCode::ProbabilityHigh
    } else if probability >= PROBABILITY_MODERATE {
        ReasonCode::ProbabilityModerate
    } else if probability >= PROBABILITY_LOW {
        ReasonCode::ProbabilityLow
    } else {
        ReasonCode::ProbabilityVeryLow
    });

    if history_source == HistorySource::InstitutionProxy {
        reasons.push(ReasonCode::InstitutionLevelHistory);
    }

    reasons
}

fn warnings(group: &CandidateGroup, result: &ProbabilityResult) -> Vec<WarningCode> {
    let mut warnings = Vec::new();
    if result.confidence < LOW_CONFIDENCE {
        warnings.push(WarningCode::LowConfidence);
    }
    if result.adjustment_risk == AdjustmentRisk::High {
        warnings.push(WarningCode::HighAdjustmentRisk);
    }
    if result.score_volatility > HIGH_VOLATILITY {
        warnings.push(WarningCode::HighVolatility);
    }
    if group.majors.len() <= FEW_MAJORS {
        warnings.push(WarningCode::FewMajors);
    }
    if result.tier == Tier::Rush && result.probability < LONG_SHOT_PROBABILITY {
        warnings.push(WarningCode::LongShot);
    }
    warnings
}

fn highlights(group: &CandidateGroup) -> Vec<HighlightCode> {
    let tags = group.institution.tags;
    let mut highlights = Vec::new();
    if tags.is_985 {
        highlights.push(HighlightCode::Tier985);
    }
    if tags.is_211 {
        highlights.push(HighlightCode::Tier211);
    }
    if tags.is_double_first_class {
        highlights.push(HighlightCode::DoubleFirstClass);
    }
    if group.majors.len() >= MANY_MAJORS {
        highlights.push(HighlightCode::ManyMajors);
    }
    if group.total_plan_count() >= LARGE_INTAKE {
        highlights.push(HighlightCode::LargeIntake);
    }
    highlights
}
