use serde::{Deserialize, Serialize};

use super::super::domain::InventoryRow;

/// Request-level restrictions applied to inventory rows before grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFilters {
    pub major_keywords: Vec<String>,
    pub include_provinces: Vec<String>,
    pub exclude_provinces: Vec<String>,
    pub require_985: bool,
    pub require_211: bool,
    pub require_double_first_class: bool,
    pub max_tuition: Option<u32>,
    pub accept_cooperative: bool,
}

impl Default for CandidateFilters {
    fn default() -> Self {
        Self {
            major_keywords: Vec::new(),
            include_provinces: Vec::new(),
            exclude_provinces: Vec::new(),
            require_985: false,
            require_211: false,
            require_double_first_class: false,
            max_tuition: None,
            accept_cooperative: true,
        }
    }
}

impl CandidateFilters {
    pub fn admits(&self, row: &InventoryRow) -> bool {
        self.admits_institution(row) && self.admits_major(row)
    }

    fn admits_institution(&self, row: &InventoryRow) -> bool {
        let province = row.institution_province.trim();
        if !self.include_provinces.is_empty()
            && !self
                .include_provinces
                .iter()
                .any(|allowed| allowed.trim() == province)
        {
            return false;
        }
        if self
            .exclude_provinces
            .iter()
            .any(|denied| denied.trim() == province)
        {
            return false;
        }

        (!self.require_985 || row.is_985)
            && (!self.require_211 || row.is_211)
            && (!self.require_double_first_class || row.is_double_first_class)
    }

    fn admits_major(&self, row: &InventoryRow) -> bool {
        if let (Some(ceiling), Some(tuition)) = (self.max_tuition, row.tuition) {
            if tuition > ceiling {
                return false;
            }
        }
        if !self.accept_cooperative && row.is_cooperative {
            return false;
        }

        let keywords: Vec<String> = self
            .major_keywords
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        if keywords.is_empty() {
            return true;
        }

        let name = row.major_name.to_lowercase();
        let category = row.major_category.as_deref().map(str::to_lowercase);
        keywords.iter().any(|keyword| {
            name.contains(keyword.as_str())
                || category
                    .as_deref()
                    .map(|category| category.contains(keyword.as_str()))
                    .unwrap_or(false)
        })
    }
}
