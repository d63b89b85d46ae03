use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::admission::aggregation::AggregatedCandidate;
use crate::workflows::admission::domain::{
    CandidateGroup, GroupIdentity, HistoricalRecord, HistoricalSeries, HistoricalYearRecord,
    InstitutionIdentity, InstitutionTags, InventoryRow, MajorOffering, StudentProfile,
};
use crate::workflows::admission::repository::{
    HistoryQuery, HistoryStore, InventoryScope, InventorySource, RepositoryError,
};
use crate::workflows::admission::{
    AdvisorSettings, HistorySource, RecommendationRequest, RecommendationService,
};
use crate::workflows::catalog::{InMemoryHistory, InMemoryInventory};

pub(super) const PROVINCE: &str = "Zhejiang";
pub(super) const SUBJECT: &str = "Physics";
pub(super) const TARGET_YEAR: u16 = 2025;

pub(super) fn student(score: u32, rank: Option<u32>) -> StudentProfile {
    StudentProfile {
        score,
        rank,
        province: PROVINCE.to_string(),
        subject_category: SUBJECT.to_string(),
        target_year: TARGET_YEAR,
    }
}

pub(super) fn request(score: u32, rank: Option<u32>) -> RecommendationRequest {
    RecommendationRequest::for_student(student(score, rank))
}

pub(super) fn year(year: u16, min_score: f64) -> HistoricalYearRecord {
    HistoricalYearRecord {
        year,
        min_score,
        avg_score: None,
        max_score: None,
        min_rank: None,
        max_rank: None,
        accepted_count: None,
    }
}

/// Three-year series with the given minimum scores, most recent first.
pub(super) fn series(min_scores: [f64; 3]) -> HistoricalSeries {
    let records = min_scores
        .iter()
        .enumerate()
        .map(|(offset, min_score)| year(TARGET_YEAR - 1 - offset as u16, *min_score))
        .collect();
    HistoricalSeries::from_records(records, 3)
}

pub(super) fn flat_series(min_score: f64) -> HistoricalSeries {
    series([min_score, min_score, min_score])
}

pub(super) fn inventory_row(
    institution_code: &str,
    institution_name: &str,
    group_code: &str,
    major_code: &str,
) -> InventoryRow {
    InventoryRow {
        year: TARGET_YEAR,
        source_province: PROVINCE.to_string(),
        subject_category: SUBJECT.to_string(),
        institution_code: institution_code.to_string(),
        institution_name: institution_name.to_string(),
        institution_province: PROVINCE.to_string(),
        is_985: false,
        is_211: false,
        is_double_first_class: false,
        group_code: group_code.to_string(),
        group_name: None,
        subject_requirement: None,
        major_code: major_code.to_string(),
        major_name: format!("Major {major_code}"),
        major_category: None,
        plan_count: 10,
        tuition: Some(5500),
        duration_years: Some(4),
        is_cooperative: false,
        popularity: None,
    }
}

pub(super) fn history_record(
    institution_code: &str,
    institution_name: &str,
    group_code: &str,
    outcome: HistoricalYearRecord,
) -> HistoricalRecord {
    HistoricalRecord {
        institution_code: institution_code.to_string(),
        institution_name: institution_name.to_string(),
        group_code: group_code.to_string(),
        group_name: None,
        province: PROVINCE.to_string(),
        subject_category: SUBJECT.to_string(),
        outcome,
    }
}

/// Flat three-year history for one group at a fixed cutoff.
pub(super) fn flat_history(
    institution_code: &str,
    institution_name: &str,
    group_code: &str,
    min_score: f64,
) -> Vec<HistoricalRecord> {
    (1..=3)
        .map(|offset| {
            history_record(
                institution_code,
                institution_name,
                group_code,
                year(TARGET_YEAR - offset, min_score),
            )
        })
        .collect()
}

pub(super) fn group(
    institution_code: &str,
    group_code: &str,
    tags: InstitutionTags,
) -> CandidateGroup {
    CandidateGroup {
        institution: InstitutionIdentity {
            code: institution_code.to_string(),
            name: format!("University {institution_code}"),
            province: PROVINCE.to_string(),
            tags,
        },
        group: GroupIdentity {
            code: group_code.to_string(),
            name: None,
            subject_requirement: None,
        },
        majors: (1..=3)
            .map(|index| MajorOffering {
                code: format!("{group_code}-{index}"),
                name: format!("Major {index}"),
                category: None,
                plan_count: 10,
                tuition: None,
                duration_years: None,
                is_cooperative: false,
            })
            .collect(),
        popularity: None,
    }
}

pub(super) fn candidate(group: CandidateGroup, series: HistoricalSeries) -> AggregatedCandidate {
    let history_source = if series.is_empty() {
        HistorySource::None
    } else {
        HistorySource::Exact
    };
    AggregatedCandidate {
        group,
        series,
        history_source,
    }
}

pub(super) fn top_tags() -> InstitutionTags {
    InstitutionTags {
        is_985: true,
        is_211: true,
        is_double_first_class: true,
    }
}

/// History store that records every bulk query it answers.
#[derive(Default)]
pub(super) struct RecordingHistory {
    inner: InMemoryHistory,
    calls: AtomicUsize,
    queries: Mutex<Vec<HistoryQuery>>,
    threads: Mutex<Vec<ThreadId>>,
}

impl RecordingHistory {
    pub(super) fn new(records: Vec<HistoricalRecord>) -> Self {
        Self {
            inner: InMemoryHistory::new(records),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn queries(&self) -> Vec<HistoryQuery> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }

    /// Threads that answered a query, in call order.
    pub(super) fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().expect("thread mutex poisoned").clone()
    }
}

impl HistoryStore for RecordingHistory {
    fn fetch_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoricalRecord>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(query.clone());
        self.threads
            .lock()
            .expect("thread mutex poisoned")
            .push(std::thread::current().id());
        self.inner.fetch_history(query)
    }
}

pub(super) struct UnavailableHistory;

impl HistoryStore for UnavailableHistory {
    fn fetch_history(
        &self,
        _query: &HistoryQuery,
    ) -> Result<Vec<HistoricalRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("history store offline".to_string()))
    }
}

pub(super) struct UnavailableInventory;

impl InventorySource for UnavailableInventory {
    fn fetch_inventory(
        &self,
        _scope: &InventoryScope,
    ) -> Result<Vec<InventoryRow>, RepositoryError> {
        Err(RepositoryError::Unavailable("inventory offline".to_string()))
    }
}

pub(super) fn build_service(
    rows: Vec<InventoryRow>,
    records: Vec<HistoricalRecord>,
) -> (
    RecommendationService<InMemoryInventory, RecordingHistory>,
    Arc<RecordingHistory>,
) {
    let history = Arc::new(RecordingHistory::new(records));
    let service = RecommendationService::new(
        Arc::new(InMemoryInventory::new(rows)),
        history.clone(),
        AdvisorSettings::default(),
    );
    (service, history)
}

/// Five regular groups whose flat cutoffs sit 5..9 points below a 600 score.
pub(super) fn stable_catalog() -> (Vec<InventoryRow>, Vec<HistoricalRecord>) {
    let mut rows = Vec::new();
    let mut records = Vec::new();
    for index in 0..5u16 {
        let code = format!("1{index:04}");
        let name = format!("University {code}");
        rows.push(inventory_row(&code, &name, "G01", "080901"));
        records.extend(flat_history(&code, &name, "G01", 591.0 + f64::from(index)));
    }
    (rows, records)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
