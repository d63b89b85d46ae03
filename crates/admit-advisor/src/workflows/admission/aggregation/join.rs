use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::super::domain::{
    CandidateGroup, CandidateKey, HistoricalRecord, HistoricalSeries, HistoricalYearRecord,
};
use super::super::repository::HistoryQuery;

/// Which fallback produced a candidate's historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySource {
    Exact,
    FuzzyGroupName,
    InstitutionProxy,
    None,
}

impl HistorySource {
    pub const fn label(self) -> &'static str {
        match self {
            HistorySource::Exact => "exact group match",
            HistorySource::FuzzyGroupName => "group name match",
            HistorySource::InstitutionProxy => "institution-level proxy",
            HistorySource::None => "no history",
        }
    }
}

#[derive(Debug, Clone)]
struct NamedOutcome {
    group_name: Option<String>,
    outcome: HistoricalYearRecord,
}

/// In-memory index over the rows returned by one bulk history query.
#[derive(Debug, Default)]
pub(crate) struct HistoryIndex {
    by_group: HashMap<CandidateKey, Vec<HistoricalYearRecord>>,
    by_institution_code: HashMap<String, Vec<NamedOutcome>>,
    by_institution_name: HashMap<String, Vec<HistoricalYearRecord>>,
    max_years: usize,
}

impl HistoryIndex {
    pub(crate) fn build(
        records: Vec<HistoricalRecord>,
        query: &HistoryQuery,
        max_years: usize,
    ) -> Self {
        let mut index = Self {
            max_years,
            ..Self::default()
        };

        for record in records.into_iter().filter(|record| query.matches(record)) {
            let key = CandidateKey {
                institution_code: record.institution_code.clone(),
                group_code: record.group_code.clone(),
            };
            index
                .by_group
                .entry(key)
                .or_default()
                .push(record.outcome.clone());
            index
                .by_institution_name
                .entry(record.institution_name.clone())
                .or_default()
                .push(record.outcome.clone());
            index
                .by_institution_code
                .entry(record.institution_code)
                .or_default()
                .push(NamedOutcome {
                    group_name: record.group_name,
                    outcome: record.outcome,
                });
        }

        index
    }
}

/// One step of the fallback chain; returns an empty series when it has nothing.
pub(crate) struct JoinStrategy {
    pub(crate) source: HistorySource,
    lookup: fn(&CandidateGroup, &HistoryIndex) -> HistoricalSeries,
}

/// Tried in order; the first non-empty series wins.
pub(crate) const JOIN_STRATEGIES: [JoinStrategy; 3] = [
    JoinStrategy {
        source: HistorySource::Exact,
        lookup: exact_group,
    },
    JoinStrategy {
        source: HistorySource::FuzzyGroupName,
        lookup: fuzzy_group_name,
    },
    JoinStrategy {
        source: HistorySource::InstitutionProxy,
        lookup: institution_proxy,
    },
];

pub(crate) fn resolve_series(
    group: &CandidateGroup,
    index: &HistoryIndex,
) -> (HistoricalSeries, HistorySource) {
    JOIN_STRATEGIES
        .iter()
        .map(|strategy| ((strategy.lookup)(group, index), strategy.source))
        .find(|(series, _)| !series.is_empty())
        .unwrap_or((HistoricalSeries::empty(), HistorySource::None))
}

fn exact_group(group: &CandidateGroup, index: &HistoryIndex) -> HistoricalSeries {
    index
        .by_group
        .get(&group.key())
        .map(|records| HistoricalSeries::from_records(records.clone(), index.max_years))
        .unwrap_or_default()
}

fn fuzzy_group_name(group: &CandidateGroup, index: &HistoryIndex) -> HistoricalSeries {
    let Some(name) = group
        .group
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return HistoricalSeries::empty();
    };

    let Some(candidates) = index.by_institution_code.get(&group.institution.code) else {
        return HistoricalSeries::empty();
    };

    let matched = candidates.iter().filter_map(|named| {
        let historical = named.group_name.as_deref()?.trim();
        historical.contains(name).then_some(&named.outcome)
    });

    HistoricalSeries::from_records(merge_by_year(matched), index.max_years)
}

fn institution_proxy(group: &CandidateGroup, index: &HistoryIndex) -> HistoricalSeries {
    index
        .by_institution_name
        .get(&group.institution.name)
        .map(|records| HistoricalSeries::from_records(merge_by_year(records), index.max_years))
        .unwrap_or_default()
}

/// Collapses several groups' outcomes into one record per year. The lowest cutoff of the
/// year supplies `min_score` and `min_rank`.
fn merge_by_year<'a>(
    records: impl IntoIterator<Item = &'a HistoricalYearRecord>,
) -> Vec<HistoricalYearRecord> {
    let mut by_year: BTreeMap<u16, Vec<&HistoricalYearRecord>> = BTreeMap::new();
    for record in records {
        by_year.entry(record.year).or_default().push(record);
    }

    by_year
        .into_iter()
        .filter_map(|(year, records)| {
            let cutoff = records
                .iter()
                .copied()
                .min_by(|a, b| a.min_score.total_cmp(&b.min_score))?;

            let averages: Vec<f64> = records.iter().filter_map(|r| r.avg_score).collect();
            let avg_score = (!averages.is_empty())
                .then(|| averages.iter().sum::<f64>() / averages.len() as f64);
            let max_score = records
                .iter()
                .filter_map(|r| r.max_score)
                .max_by(f64::total_cmp);
            let max_rank = records.iter().filter_map(|r| r.max_rank).max();
            let accepted: Vec<u32> = records.iter().filter_map(|r| r.accepted_count).collect();
            let accepted_count = (!accepted.is_empty())
                .then(|| accepted.iter().fold(0u32, |sum, count| sum.saturating_add(*count)));

            Some(HistoricalYearRecord {
                year,
                min_score: cutoff.min_score,
                avg_score,
                max_score,
                min_rank: cutoff.min_rank,
                max_rank,
                accepted_count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(year: u16, min_score: f64, accepted: Option<u32>) -> HistoricalYearRecord {
        HistoricalYearRecord {
            year,
            min_score,
            avg_score: Some(min_score + 5.0),
            max_score: Some(min_score + 12.0),
            min_rank: Some(20000 - min_score as u32),
            max_rank: None,
            accepted_count: accepted,
        }
    }

    #[test]
    fn merge_keeps_lowest_cutoff_per_year() {
        let a = outcome(2024, 610.0, Some(30));
        let b = outcome(2024, 590.0, Some(20));
        let c = outcome(2023, 600.0, None);

        let merged = merge_by_year([&a, &b, &c]);

        assert_eq!(merged.len(), 2);
        let latest = merged
            .iter()
            .find(|record| record.year == 2024)
            .expect("2024 merged");
        assert_eq!(latest.min_score, 590.0);
        assert_eq!(latest.min_rank, b.min_rank);
        assert_eq!(latest.max_score, Some(622.0));
        assert_eq!(latest.avg_score, Some(605.0));
        assert_eq!(latest.accepted_count, Some(50));

        let earlier = merged
            .iter()
            .find(|record| record.year == 2023)
            .expect("2023 merged");
        assert_eq!(earlier.accepted_count, None);
    }

    #[test]
    fn strategies_are_ordered_exact_fuzzy_proxy() {
        let sources: Vec<HistorySource> = JOIN_STRATEGIES
            .iter()
            .map(|strategy| strategy.source)
            .collect();
        assert_eq!(
            sources,
            vec![
                HistorySource::Exact,
                HistorySource::FuzzyGroupName,
                HistorySource::InstitutionProxy
            ]
        );
    }
}
