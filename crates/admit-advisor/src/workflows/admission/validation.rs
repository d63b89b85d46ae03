use super::ranking::TierTargets;
use super::service::RecommendationRequest;

/// Largest per-tier count a request may ask for.
pub const MAX_TIER_COUNT: usize = 100;

/// Validation errors raised before any computation happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("student province is required")]
    MissingProvince,
    #[error("student subject category is required")]
    MissingSubjectCategory,
    #[error("target year must be set")]
    MissingTargetYear,
    #[error("province {0:?} is both included and excluded")]
    ConflictingProvince(String),
    #[error("{tier} count {found} exceeds the limit of {max}")]
    TierCountTooLarge {
        tier: &'static str,
        found: usize,
        max: usize,
    },
}

/// Guard turning an inbound request into the tier targets it resolves to.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    defaults: TierTargets,
    max_tier_count: usize,
}

impl Default for RequestGuard {
    fn default() -> Self {
        Self::new(TierTargets::default())
    }
}

impl RequestGuard {
    pub fn new(defaults: TierTargets) -> Self {
        Self {
            defaults,
            max_tier_count: MAX_TIER_COUNT,
        }
    }

    pub fn defaults(&self) -> &TierTargets {
        &self.defaults
    }

    /// Validates the request and resolves its tier targets.
    pub fn check(&self, request: &RecommendationRequest) -> Result<TierTargets, RequestError> {
        let student = &request.student;
        if student.province.trim().is_empty() {
            return Err(RequestError::MissingProvince);
        }
        if student.subject_category.trim().is_empty() {
            return Err(RequestError::MissingSubjectCategory);
        }
        if student.target_year == 0 {
            return Err(RequestError::MissingTargetYear);
        }

        let filters = &request.filters;
        if let Some(conflict) = filters.include_provinces.iter().find(|included| {
            filters
                .exclude_provinces
                .iter()
                .any(|excluded| excluded.trim() == included.trim())
        }) {
            return Err(RequestError::ConflictingProvince(conflict.trim().to_string()));
        }

        let targets = self.defaults.with_overrides(
            request.rush_count,
            request.stable_count,
            request.safe_count,
        );
        for (tier, found) in [
            ("rush", targets.rush),
            ("stable", targets.stable),
            ("safe", targets.safe),
        ] {
            if found > self.max_tier_count {
                return Err(RequestError::TierCountTooLarge {
                    tier,
                    found,
                    max: self.max_tier_count,
                });
            }
        }

        Ok(targets)
    }
}
