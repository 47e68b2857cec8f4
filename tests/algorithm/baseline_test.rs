//! Tests for baseline building against a seeded store

use claims_tmean::models::baseline::BaselineKind;
use claims_tmean::{DuplicatePolicy, MeasurementDomain, PipelineConfig, PipelineError, build_baselines};

use crate::utils::{ClaimRow, seeded_store};

const LOS: MeasurementDomain = MeasurementDomain::LengthOfStay;

#[test]
fn test_secondary_code_across_slots() {
    let store = seeded_store(&[
        ClaimRow::new("A", Some("P")).secondary(3, "X").days(10),
        ClaimRow::new("B", Some("P")).secondary(7, "X").days(20),
    ]);

    let summary = build_baselines(&store, LOS, &PipelineConfig::default())
        .unwrap()
        .expect("baselines built");
    assert_eq!(summary.claim_count, 2);
    assert_eq!(summary.secondary_code_count, 1);

    let secondary = store.load_baseline(LOS, BaselineKind::Secondary).unwrap().unwrap();
    assert_eq!(secondary.get("X"), Some(15.0));
}

#[test]
fn test_sample_principal_baseline() {
    let store = seeded_store(&[
        ClaimRow::new("1", Some("A")).secondary(1, "S").days(5),
        ClaimRow::new("2", Some("A")).secondary(1, "S").days(15),
    ]);
    build_baselines(&store, LOS, &PipelineConfig::default()).unwrap();

    let principal = store.load_baseline(LOS, BaselineKind::Principal).unwrap().unwrap();
    assert_eq!(principal.get("A"), Some(10.0));

    let measurements = store.load_measurements(LOS).unwrap().unwrap();
    assert_eq!(measurements.get("1"), Some(&Some(5.0)));
    assert_eq!(measurements.get("2"), Some(&Some(15.0)));
}

#[test]
fn test_absent_principal_codes_have_no_baseline_row() {
    let store = seeded_store(&[
        ClaimRow::new("1", Some("A")).days(4),
        ClaimRow::new("2", None).days(30),
        ClaimRow::new("3", Some("None")).days(30),
        ClaimRow::new("4", Some("  ")).days(30),
    ]);
    build_baselines(&store, LOS, &PipelineConfig::default()).unwrap();

    let principal = store.load_baseline(LOS, BaselineKind::Principal).unwrap().unwrap();
    assert_eq!(principal.len(), 1);
    assert_eq!(principal.get("A"), Some(4.0));
    assert_eq!(store.row_count(LOS.principal_baseline_table()).unwrap(), 1);
}

#[test]
fn test_duplicate_claims_first_row_wins() {
    let store = seeded_store(&[
        ClaimRow::new("1", Some("A")).days(5),
        ClaimRow::new("1", Some("A")).days(500),
        ClaimRow::new("2", Some("A")).days(15),
    ]);
    let summary = build_baselines(&store, LOS, &PipelineConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(summary.duplicates_dropped, 1);
    assert_eq!(summary.claim_count, 2);

    let principal = store.load_baseline(LOS, BaselineKind::Principal).unwrap().unwrap();
    assert_eq!(principal.get("A"), Some(10.0));
    assert_eq!(store.row_count(LOS.measurement_table()).unwrap(), 2);
}

#[test]
fn test_duplicate_claims_rejected() {
    let store = seeded_store(&[
        ClaimRow::new("1", Some("A")).days(5),
        ClaimRow::new("1", Some("B")).days(6),
    ]);
    let config = PipelineConfig::new().with_duplicate_policy(DuplicatePolicy::Reject);
    let result = build_baselines(&store, LOS, &config);
    assert!(matches!(result, Err(PipelineError::DuplicateClaim(id)) if id == "1"));
    assert!(!store.table_exists(LOS.measurement_table()).unwrap());
}

#[test]
fn test_unparseable_dates_leave_measurement_null() {
    let mut broken = ClaimRow::new("2", Some("A"));
    broken.from = Some("yesterday".to_string());
    broken.thru = Some("2015-01-03".to_string());
    let store = seeded_store(&[ClaimRow::new("1", Some("A")).days(8), broken]);

    let summary = build_baselines(&store, LOS, &PipelineConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(summary.missing_measurement_count, 1);

    let principal = store.load_baseline(LOS, BaselineKind::Principal).unwrap().unwrap();
    assert_eq!(principal.get("A"), Some(8.0));
    let measurements = store.load_measurements(LOS).unwrap().unwrap();
    assert_eq!(measurements.get("2"), Some(&None));
}

#[test]
fn test_missing_columns_is_a_no_op() {
    let store = claims_tmean::ClaimStore::in_memory().unwrap();
    store
        .connection()
        .execute_batch("CREATE TABLE cms_claims (CLM_ID TEXT, PRNCPAL_DGNS_CD TEXT, CLM_FROM_DT TEXT);")
        .unwrap();

    let summary = build_baselines(&store, LOS, &PipelineConfig::default()).unwrap();
    assert!(summary.is_none());
    assert!(!store.table_exists(LOS.measurement_table()).unwrap());
    assert!(!store.table_exists(LOS.principal_baseline_table()).unwrap());
}

#[test]
fn test_charge_baselines_reset_predictions_table() {
    let charge = MeasurementDomain::TotalCharge;
    let store = seeded_store(&[
        ClaimRow::new("1", Some("A")).charge(1000.0),
        ClaimRow::new("2", Some("A")).charge(3000.0),
    ]);
    build_baselines(&store, charge, &PipelineConfig::default()).unwrap();

    let principal = store.load_baseline(charge, BaselineKind::Principal).unwrap().unwrap();
    assert_eq!(principal.get("A"), Some(2000.0));
    assert!(store.table_exists(charge.predictions_table()).unwrap());
    assert_eq!(store.row_count(charge.predictions_table()).unwrap(), 0);
    assert!(
        store
            .table_columns(charge.predictions_table())
            .unwrap()
            .contains(&charge.score_column())
    );
}
