use std::sync::Arc;

use super::common::*;
use crate::workflows::admission::aggregation::HistorySource;
use crate::workflows::admission::domain::{HistoricalSeries, InstitutionTags, Tier};
use crate::workflows::admission::explain::ReasonCode;
use crate::workflows::admission::repository::RepositoryError;
use crate::workflows::admission::validation::RequestError;
use crate::workflows::admission::{
    evaluate_all, AdvisorSettings, FilterReason, InstitutionTier, RecommendationError,
    RecommendationService,
};
use crate::workflows::catalog::InMemoryInventory;

#[test]
fn empty_inventory_returns_empty_tiers_without_error() {
    let (service, history) = build_service(Vec::new(), Vec::new());

    let recommendations = service
        .recommend(&request(600, None))
        .expect("empty result is not an error");

    assert!(recommendations.rush.is_empty());
    assert!(recommendations.stable.is_empty());
    assert!(recommendations.safe.is_empty());
    assert!(recommendations.is_empty());
    assert_eq!(recommendations.summary.total, 0);
    assert_eq!(recommendations.summary.stable.average_probability, 0.0);
    assert_eq!(recommendations.diagnostics.candidates_evaluated, 0);
    assert_eq!(history.calls(), 0);
}

#[test]
fn under_filled_stable_tier_returns_all_candidates() {
    let (rows, records) = stable_catalog();
    let (service, history) = build_service(rows, records);

    let recommendations = service
        .recommend(&request(600, None))
        .expect("recommendations");

    assert_eq!(recommendations.stable.len(), 5);
    assert_eq!(recommendations.summary.stable.count, 5);
    assert_eq!(recommendations.summary.stable.average_probability, 74.0);
    assert_eq!(recommendations.summary.total, 5);
    assert_eq!(
        recommendations.summary.institution_tiers.get(&InstitutionTier::Regular),
        Some(&5)
    );
    assert_eq!(history.calls(), 1);
}

#[test]
fn recommendations_carry_explanations_and_diagnostics() {
    let mut rows = Vec::new();
    let mut records = Vec::new();

    let mut elite = inventory_row("10001", "North University", "G01", "080901");
    elite.is_985 = true;
    elite.is_211 = true;
    rows.push(elite);
    records.extend(flat_history("10001", "North University", "G01", 612.0));

    rows.push(inventory_row("10002", "South University", "G01", "080901"));
    records.extend(flat_history("10002", "South University", "G01", 590.0));

    rows.push(inventory_row("10003", "East University", "G01", "080901"));
    records.extend(flat_history("10003", "East University", "G01", 660.0));

    rows.push(inventory_row("10004", "West University", "G01", "080901"));

    let (service, history) = build_service(rows, records);
    let recommendations = service
        .recommend(&request(600, None))
        .expect("recommendations");

    assert_eq!(history.calls(), 1);
    assert_eq!(recommendations.rush.len(), 1);
    let rush = &recommendations.rush[0];
    assert_eq!(rush.group.institution.code, "10001");
    assert_eq!(rush.result.probability, 20.0);
    assert!(rush.reasons.contains(&ReasonCode::TopTierInstitution));

    let stable_codes: Vec<&str> = recommendations
        .stable
        .iter()
        .map(|entry| entry.group.institution.code.as_str())
        .collect();
    assert_eq!(stable_codes, vec!["10004", "10002"]);
    let without_history = &recommendations.stable[0];
    assert_eq!(without_history.result.probability, 50.0);
    assert_eq!(without_history.reasons[0], ReasonCode::NoHistoricalData);

    let diagnostics = &recommendations.diagnostics;
    assert_eq!(diagnostics.candidates_evaluated, 4);
    assert_eq!(diagnostics.without_history, 1);
    assert_eq!(diagnostics.filtered.len(), 1);
    assert_eq!(diagnostics.filtered[0].key.institution_code, "10003");
    assert_eq!(diagnostics.filtered[0].reason, FilterReason::RushGapTooLarge);
    assert_eq!(diagnostics.filtered[0].tier, Tier::Rush);
}

#[test]
fn per_request_counts_truncate_tiers() {
    let (rows, records) = stable_catalog();
    let (service, _) = build_service(rows, records);
    let mut req = request(600, None);
    req.stable_count = Some(2);

    let recommendations = service.recommend(&req).expect("recommendations");

    assert_eq!(recommendations.stable.len(), 2);
    assert_eq!(recommendations.diagnostics.candidates_evaluated, 5);
}

#[test]
fn invalid_request_performs_no_io() {
    let (rows, records) = stable_catalog();
    let (service, history) = build_service(rows, records);
    let mut req = request(600, None);
    req.student.subject_category = " ".to_string();

    match service.recommend(&req) {
        Err(RecommendationError::InvalidRequest(RequestError::MissingSubjectCategory)) => {}
        other => panic!("expected invalid request, got {other:?}"),
    }
    assert_eq!(history.calls(), 0);
}

#[test]
fn store_outage_surfaces_as_repository_error() {
    let (rows, _) = stable_catalog();
    let service = RecommendationService::new(
        Arc::new(InMemoryInventory::new(rows)),
        Arc::new(UnavailableHistory),
        AdvisorSettings::default(),
    );

    match service.recommend(&request(600, None)) {
        Err(RecommendationError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable store, got {other:?}"),
    }
}

#[test]
fn history_years_setting_is_clamped() {
    let settings = AdvisorSettings {
        history_years: 12,
        ..AdvisorSettings::default()
    };
    let service = RecommendationService::new(
        Arc::new(InMemoryInventory::default()),
        Arc::new(RecordingHistory::default()),
        settings,
    );

    assert_eq!(service.history_years(), 5);
}

#[test]
fn merged_history_does_not_drive_plan_change() {
    let rows = vec![inventory_row("10001", "North University", "G03", "080903")];
    let records: Vec<_> = (11..=15)
        .flat_map(|sibling| {
            (1..=3).map(move |offset| {
                let mut outcome = year(TARGET_YEAR - offset, 600.0);
                outcome.accepted_count = Some(10);
                history_record("10001", "North University", &format!("G{sibling}"), outcome)
            })
        })
        .collect();

    let (service, _history) = build_service(rows, records);
    let recommendations = service
        .recommend(&request(600, None))
        .expect("recommendations");

    assert_eq!(recommendations.stable.len(), 1);
    let proxy = &recommendations.stable[0];
    assert_eq!(proxy.history_source, HistorySource::InstitutionProxy);
    assert_eq!(proxy.result.plan_change_rate, 0.0);
    assert_eq!(proxy.result.probability, 65.0);
    assert_eq!(proxy.result.confidence, 100.0);
}

#[test]
fn exact_history_still_drives_plan_change() {
    let mut accepted = flat_series(600.0).records().to_vec();
    for record in &mut accepted {
        record.accepted_count = Some(50);
    }
    let series = HistoricalSeries::from_records(accepted, 3);

    let exact = candidate(group("10001", "G01", InstitutionTags::default()), series.clone());
    let mut proxy = candidate(group("10002", "G01", InstitutionTags::default()), series);
    proxy.history_source = HistorySource::InstitutionProxy;

    let evaluated = evaluate_all(&student(600, None), vec![exact, proxy]);

    assert_eq!(evaluated[0].result.plan_change_rate, -0.4);
    assert_eq!(evaluated[0].result.probability, 60.0);
    assert_eq!(evaluated[1].result.plan_change_rate, 0.0);
    assert_eq!(evaluated[1].result.probability, 65.0);
}
