//! Candidate aggregation: groups inventory rows into candidate groups and attaches
//! historical series through a single bulk lookup joined in memory.

mod filters;
mod join;

pub use filters::CandidateFilters;
pub use join::HistorySource;

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use super::domain::{
    CandidateGroup, CandidateKey, GroupIdentity, HistoricalRecord, HistoricalSeries,
    InstitutionIdentity, InventoryRow,
};
use super::repository::{
    HistoryQuery, HistoryStore, InventoryScope, InventorySource, RepositoryError,
};
use join::HistoryIndex;

/// A candidate group paired with the series the fallback join resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedCandidate {
    pub group: CandidateGroup,
    pub series: HistoricalSeries,
    pub history_source: HistorySource,
}

/// Read-only boundary between the engine and its two data collaborators.
pub struct CandidateAggregator<'a, I, H> {
    inventory: &'a I,
    history: &'a H,
    history_years: usize,
}

impl<'a, I, H> CandidateAggregator<'a, I, H>
where
    I: InventorySource,
    H: HistoryStore,
{
    pub fn new(inventory: &'a I, history: &'a H, history_years: usize) -> Self {
        Self {
            inventory,
            history,
            history_years,
        }
    }

    /// Fetches inventory, groups it, and resolves history with one bulk query.
    pub fn aggregate(
        &self,
        scope: &InventoryScope,
        filters: &CandidateFilters,
    ) -> Result<Vec<AggregatedCandidate>, RepositoryError> {
        let rows = self.inventory.fetch_inventory(scope)?;
        let row_count = rows.len();
        let groups = group_rows(rows, scope, filters);
        debug!(rows = row_count, groups = groups.len(), "grouped inventory rows");

        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let query = history_query(&groups, scope);
        let records = self.history.fetch_history(&query)?;
        debug!(records = records.len(), "fetched historical outcomes");

        Ok(join_history(groups, records, &query, self.history_years))
    }
}

/// Groups rows by (institution code, group code) in first-seen order. Rows outside the
/// scope or rejected by the filters are skipped; groups left without majors are dropped.
pub fn group_rows(
    rows: Vec<InventoryRow>,
    scope: &InventoryScope,
    filters: &CandidateFilters,
) -> Vec<CandidateGroup> {
    let mut groups: Vec<CandidateGroup> = Vec::new();
    let mut positions: HashMap<CandidateKey, usize> = HashMap::new();

    for row in rows {
        if row.year != scope.year
            || row.source_province != scope.province
            || row.subject_category != scope.subject_category
            || !filters.admits(&row)
        {
            continue;
        }

        let key = CandidateKey {
            institution_code: row.institution_code.clone(),
            group_code: row.group_code.clone(),
        };
        let major = row.major();
        let popularity = row.popularity;

        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(CandidateGroup {
                institution: InstitutionIdentity {
                    code: row.institution_code.clone(),
                    name: row.institution_name.clone(),
                    province: row.institution_province.clone(),
                    tags: row.tags(),
                },
                group: GroupIdentity {
                    code: row.group_code.clone(),
                    name: row.group_name.clone(),
                    subject_requirement: row.subject_requirement.clone(),
                },
                majors: Vec::new(),
                popularity: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        if group.majors.iter().any(|existing| existing.code == major.code) {
            continue;
        }
        group.majors.push(major);
        group.popularity = match (group.popularity, popularity) {
            (Some(current), Some(next)) => Some(current.max(next)),
            (current, next) => current.or(next),
        };
    }

    groups.retain(|group| !group.majors.is_empty());
    groups
}

/// Builds the single bulk query covering every group's institution code and name.
pub fn history_query(groups: &[CandidateGroup], scope: &InventoryScope) -> HistoryQuery {
    let institution_codes: BTreeSet<String> = groups
        .iter()
        .map(|group| group.institution.code.clone())
        .collect();
    let institution_names: BTreeSet<String> = groups
        .iter()
        .map(|group| group.institution.name.clone())
        .collect();

    HistoryQuery {
        province: scope.province.clone(),
        subject_category: scope.subject_category.clone(),
        before_year: scope.year,
        institution_codes,
        institution_names,
    }
}

/// Joins bulk-fetched history onto groups in memory via the fallback chain.
pub fn join_history(
    groups: Vec<CandidateGroup>,
    records: Vec<HistoricalRecord>,
    query: &HistoryQuery,
    history_years: usize,
) -> Vec<AggregatedCandidate> {
    let index = HistoryIndex::build(records, query, history_years);

    groups
        .into_iter()
        .map(|group| {
            let (series, history_source) = join::resolve_series(&group, &index);
            AggregatedCandidate {
                group,
                series,
                history_source,
            }
        })
        .collect()
}
