//! Tests for feature assembly

use arrow::array::Array;

use claims_tmean::algorithm::baseline::{build_principal_baseline, build_secondary_baseline};
use claims_tmean::algorithm::features::assemble_features;
use claims_tmean::algorithm::scorer::feature_matrix;
use claims_tmean::models::claim::{PRINCIPAL_TMEAN_COLUMN, SECONDARY_SLOTS, secondary_tmean_column};
use claims_tmean::models::schema::FEATURE_COUNT;
use claims_tmean::utils::arrow::float64_column;
use claims_tmean::{Claim, MeasurementDomain};

const LOS: MeasurementDomain = MeasurementDomain::LengthOfStay;

fn sample_claims() -> Vec<Claim> {
    vec![
        Claim::new("1", Some("A"), Some(5.0))
            .with_secondary(1, Some("X"))
            .with_secondary(4, Some("X")),
        Claim::new("2", Some("A"), Some(15.0)).with_secondary(0, Some("Y")),
        Claim::new("3", None, Some(9.0)).with_secondary(0, Some("X")),
        Claim::new("4", Some("B"), Some(3.0)),
    ]
}

#[test]
fn test_same_code_in_two_slots_resolves_identically() {
    let claims = sample_claims();
    let batch = assemble_features(
        LOS,
        &claims,
        &build_principal_baseline(&claims),
        &build_secondary_baseline(&claims),
        false,
    )
    .unwrap();

    let slot2 = float64_column(&batch, &secondary_tmean_column(1)).unwrap();
    let slot5 = float64_column(&batch, &secondary_tmean_column(4)).unwrap();
    assert!(!slot2.is_null(0));
    assert_eq!(slot2.value(0), slot5.value(0));
    // X is on claims 1 (5 days) and 3 (9 days)
    assert_eq!(slot2.value(0), 7.0);
}

#[test]
fn test_sample_feature_row_carries_principal_baseline() {
    let claims = vec![
        Claim::new("1", Some("A"), Some(5.0)).with_secondary(0, Some("S")),
        Claim::new("2", Some("A"), Some(15.0)).with_secondary(0, Some("S")),
    ];
    let batch = assemble_features(
        LOS,
        &claims,
        &build_principal_baseline(&claims),
        &build_secondary_baseline(&claims),
        false,
    )
    .unwrap();
    let principal = float64_column(&batch, PRINCIPAL_TMEAN_COLUMN).unwrap();
    assert_eq!(principal.value(0), 10.0);
    assert_eq!(principal.value(1), 10.0);
}

#[test]
fn test_null_principal_claim_is_kept_with_null_baseline() {
    let claims = sample_claims();
    let batch = assemble_features(
        LOS,
        &claims,
        &build_principal_baseline(&claims),
        &build_secondary_baseline(&claims),
        false,
    )
    .unwrap();

    assert_eq!(batch.num_rows(), claims.len());
    let principal = float64_column(&batch, PRINCIPAL_TMEAN_COLUMN).unwrap();
    assert!(principal.is_null(2));
    assert_eq!(principal.value(0), 10.0);
}

#[test]
fn test_claim_without_secondary_codes_passes_through() {
    let claims = sample_claims();
    let batch = assemble_features(
        LOS,
        &claims,
        &build_principal_baseline(&claims),
        &build_secondary_baseline(&claims),
        false,
    )
    .unwrap();

    for slot in 0..SECONDARY_SLOTS {
        assert!(float64_column(&batch, &secondary_tmean_column(slot)).unwrap().is_null(3));
    }
    assert_eq!(float64_column(&batch, PRINCIPAL_TMEAN_COLUMN).unwrap().value(3), 3.0);
}

#[test]
fn test_unknown_codes_are_join_misses() {
    let training = vec![Claim::new("1", Some("A"), Some(5.0)).with_secondary(0, Some("X"))];
    let scoring = vec![Claim::new("9", Some("Q"), Some(5.0)).with_secondary(0, Some("Z"))];
    let batch = assemble_features(
        LOS,
        &scoring,
        &build_principal_baseline(&training),
        &build_secondary_baseline(&training),
        false,
    )
    .unwrap();
    assert!(float64_column(&batch, PRINCIPAL_TMEAN_COLUMN).unwrap().is_null(0));
    assert!(float64_column(&batch, &secondary_tmean_column(0)).unwrap().is_null(0));
}

#[test]
fn test_model_matrix_order_and_missing_values() {
    let claims = sample_claims();
    let batch = assemble_features(
        LOS,
        &claims,
        &build_principal_baseline(&claims),
        &build_secondary_baseline(&claims),
        false,
    )
    .unwrap();
    let matrix = feature_matrix(&batch).unwrap();

    assert_eq!(matrix.rows(), claims.len());
    assert_eq!(matrix.cols(), FEATURE_COUNT);
    // principal baseline is the last feature
    assert_eq!(matrix.row(0)[FEATURE_COUNT - 1], 10.0);
    assert!(matrix.row(2)[FEATURE_COUNT - 1].is_nan());
    // secondary slot 1 comes first
    assert_eq!(matrix.row(1)[0], 15.0);
    assert!(matrix.row(3)[0].is_nan());
}
