use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{HistoricalRecord, InventoryRow, StudentProfile};

/// Current-year inventory scope: the student's source province, subject track and year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryScope {
    pub year: u16,
    pub province: String,
    pub subject_category: String,
}

impl InventoryScope {
    pub fn for_student(student: &StudentProfile) -> Self {
        Self {
            year: student.target_year,
            province: student.province.clone(),
            subject_category: student.subject_category.clone(),
        }
    }
}

/// One bulk lookup covering every candidate of a request.
///
/// Stores return rows for the scope (`year < before_year`) whose institution code is in
/// `institution_codes` or whose institution name is in `institution_names`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub province: String,
    pub subject_category: String,
    pub before_year: u16,
    pub institution_codes: BTreeSet<String>,
    pub institution_names: BTreeSet<String>,
}

impl HistoryQuery {
    pub fn is_empty(&self) -> bool {
        self.institution_codes.is_empty() && self.institution_names.is_empty()
    }

    pub fn matches(&self, record: &HistoricalRecord) -> bool {
        record.province == self.province
            && record.subject_category == self.subject_category
            && record.outcome.year < self.before_year
            && (self.institution_codes.contains(&record.institution_code)
                || self.institution_names.contains(&record.institution_name))
    }
}

/// Source of current-year offerings.
pub trait InventorySource: Send + Sync {
    fn fetch_inventory(&self, scope: &InventoryScope)
        -> Result<Vec<InventoryRow>, RepositoryError>;
}

/// Source of historical admission outcomes.
pub trait HistoryStore: Send + Sync {
    fn fetch_history(&self, query: &HistoryQuery)
        -> Result<Vec<HistoricalRecord>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store returned malformed data: {0}")]
    Malformed(String),
}
