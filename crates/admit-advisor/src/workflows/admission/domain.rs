use serde::{Deserialize, Serialize};

/// Applicant snapshot used for a single recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub score: u32,
    #[serde(default)]
    pub rank: Option<u32>,
    pub province: String,
    pub subject_category: String,
    pub target_year: u16,
}

/// One year of published admission outcomes for a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYearRecord {
    pub year: u16,
    pub min_score: f64,
    #[serde(default)]
    pub avg_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub min_rank: Option<u32>,
    #[serde(default)]
    pub max_rank: Option<u32>,
    #[serde(default)]
    pub accepted_count: Option<u32>,
}

/// Most-recent-first sequence of yearly outcomes, one record per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalSeries(Vec<HistoricalYearRecord>);

impl HistoricalSeries {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a series from arbitrary records: sorts by year descending, keeps the first
    /// record seen for each year and truncates to `max_years`.
    pub fn from_records(mut records: Vec<HistoricalYearRecord>, max_years: usize) -> Self {
        records.sort_by(|a, b| b.year.cmp(&a.year));
        records.dedup_by_key(|record| record.year);
        records.truncate(max_years);
        Self(records)
    }

    pub fn records(&self) -> &[HistoricalYearRecord] {
        &self.0
    }

    pub fn latest(&self) -> Option<&HistoricalYearRecord> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Redundant institution tags carried on every inventory row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionTags {
    pub is_985: bool,
    pub is_211: bool,
    pub is_double_first_class: bool,
}

impl InstitutionTags {
    pub const fn tier(self) -> InstitutionTier {
        if self.is_985 {
            InstitutionTier::Top
        } else if self.is_211 {
            InstitutionTier::Next
        } else if self.is_double_first_class {
            InstitutionTier::Recognized
        } else {
            InstitutionTier::Regular
        }
    }
}

/// Coarse institution prestige level, ordered so that a stronger tier compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionTier {
    Regular,
    Recognized,
    Next,
    Top,
}

impl InstitutionTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Top, Self::Next, Self::Recognized, Self::Regular]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "985",
            Self::Next => "211",
            Self::Recognized => "Double First-Class",
            Self::Regular => "Regular",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionIdentity {
    pub code: String,
    pub name: String,
    pub province: String,
    pub tags: InstitutionTags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupIdentity {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject_requirement: Option<String>,
}

/// A major offered inside an admission group for the current year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorOffering {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub plan_count: u32,
    #[serde(default)]
    pub tuition: Option<u32>,
    #[serde(default)]
    pub duration_years: Option<u8>,
    #[serde(default)]
    pub is_cooperative: bool,
}

/// An (institution, admission group) pairing the student could apply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGroup {
    pub institution: InstitutionIdentity,
    pub group: GroupIdentity,
    pub majors: Vec<MajorOffering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

impl CandidateGroup {
    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            institution_code: self.institution.code.clone(),
            group_code: self.group.code.clone(),
        }
    }

    pub fn institution_tier(&self) -> InstitutionTier {
        self.institution.tags.tier()
    }

    pub fn total_plan_count(&self) -> u32 {
        self.majors
            .iter()
            .fold(0u32, |total, major| total.saturating_add(major.plan_count))
    }
}

/// Composite key identifying a candidate group within one scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateKey {
    pub institution_code: String,
    pub group_code: String,
}

/// Flat current-year inventory row: one offered major within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub year: u16,
    pub source_province: String,
    pub subject_category: String,
    pub institution_code: String,
    pub institution_name: String,
    pub institution_province: String,
    #[serde(default)]
    pub is_985: bool,
    #[serde(default)]
    pub is_211: bool,
    #[serde(default)]
    pub is_double_first_class: bool,
    pub group_code: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub subject_requirement: Option<String>,
    pub major_code: String,
    pub major_name: String,
    #[serde(default)]
    pub major_category: Option<String>,
    pub plan_count: u32,
    #[serde(default)]
    pub tuition: Option<u32>,
    #[serde(default)]
    pub duration_years: Option<u8>,
    #[serde(default)]
    pub is_cooperative: bool,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl InventoryRow {
    pub fn tags(&self) -> InstitutionTags {
        InstitutionTags {
            is_985: self.is_985,
            is_211: self.is_211,
            is_double_first_class: self.is_double_first_class,
        }
    }

    pub fn major(&self) -> MajorOffering {
        MajorOffering {
            code: self.major_code.clone(),
            name: self.major_name.clone(),
            category: self.major_category.clone(),
            plan_count: self.plan_count,
            tuition: self.tuition,
            duration_years: self.duration_years,
            is_cooperative: self.is_cooperative,
        }
    }
}

/// Flat historical outcome row as returned by the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub institution_code: String,
    pub institution_name: String,
    pub group_code: String,
    #[serde(default)]
    pub group_name: Option<String>,
    pub province: String,
    pub subject_category: String,
    #[serde(flatten)]
    pub outcome: HistoricalYearRecord,
}

/// Risk classification of a candidate relative to the student's chance of admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Rush,
    Stable,
    Safe,
}

impl Tier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Rush, Self::Stable, Self::Safe]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rush => "Rush",
            Self::Stable => "Stable",
            Self::Safe => "Safe",
        }
    }
}

/// Likelihood of being admitted but reassigned away from the preferred majors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentRisk {
    High,
    Medium,
    Low,
}

impl AdjustmentRisk {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}
