use serde::{Deserialize, Serialize};

use super::super::domain::{InstitutionTier, Tier};

pub const DEFAULT_RUSH_COUNT: usize = 12;
pub const DEFAULT_STABLE_COUNT: usize = 20;
pub const DEFAULT_SAFE_COUNT: usize = 8;

/// Number of recommendations kept per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTargets {
    pub rush: usize,
    pub stable: usize,
    pub safe: usize,
}

impl Default for TierTargets {
    fn default() -> Self {
        Self {
            rush: DEFAULT_RUSH_COUNT,
            stable: DEFAULT_STABLE_COUNT,
            safe: DEFAULT_SAFE_COUNT,
        }
    }
}

impl TierTargets {
    pub const fn for_tier(&self, tier: Tier) -> usize {
        match tier {
            Tier::Rush => self.rush,
            Tier::Stable => self.stable,
            Tier::Safe => self.safe,
        }
    }

    /// Applies per-request overrides on top of these targets.
    pub fn with_overrides(
        self,
        rush: Option<usize>,
        stable: Option<usize>,
        safe: Option<usize>,
    ) -> Self {
        Self {
            rush: rush.unwrap_or(self.rush),
            stable: stable.unwrap_or(self.stable),
            safe: safe.unwrap_or(self.safe),
        }
    }
}

/// Weights of the composite rank score. Each component contributes at most its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub college_level_weight: f64,
    pub preference_weight: f64,
    pub location_weight: f64,
    pub employability_weight: f64,
    pub probability_weight: f64,
    pub confidence_weight: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            college_level_weight: 30.0,
            preference_weight: 25.0,
            location_weight: 15.0,
            employability_weight: 10.0,
            probability_weight: 20.0,
            confidence_weight: 5.0,
        }
    }
}

/// Share of `college_level_weight` granted per institution tier.
pub(crate) const fn institution_share(tier: InstitutionTier) -> f64 {
    match tier {
        InstitutionTier::Top => 1.0,
        InstitutionTier::Next => 0.7,
        InstitutionTier::Recognized => 0.5,
        InstitutionTier::Regular => 0.0,
    }
}

pub(crate) const PREFERENCE_FULL_SHARE: f64 = 1.0;
pub(crate) const PREFERENCE_PARTIAL_SHARE: f64 = 0.5;
pub(crate) const PREFERENCE_UNSPECIFIED_SHARE: f64 = 0.6;
pub(crate) const LOCATION_MATCH_SHARE: f64 = 1.0;
pub(crate) const LOCATION_UNSPECIFIED_SHARE: f64 = 0.5;
// Placeholder until an employability signal exists.
pub(crate) const EMPLOYABILITY_DEFAULT_SHARE: f64 = 0.5;
pub(crate) const PROBABILITY_CLOSENESS_SPAN: f64 = 50.0;

/// Probability each tier ideally sits at.
pub(crate) const fn ideal_probability(tier: Tier) -> f64 {
    match tier {
        Tier::Rush => 25.0,
        Tier::Stable => 55.0,
        Tier::Safe => 85.0,
    }
}

/// What the student would like to study and where.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPreferences {
    pub preferred_majors: Vec<String>,
    pub preferred_categories: Vec<String>,
    pub preferred_provinces: Vec<String>,
}
