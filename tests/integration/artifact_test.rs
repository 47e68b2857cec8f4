//! Tests for loading estimator artifacts from disk

use std::fs;

use claims_tmean::estimator::{FeatureMatrix, load_outlier_scorer, load_regressor};
use claims_tmean::PipelineError;

use crate::utils::{negative_residual_forest_artifact, principal_linear_artifact};

const FOREST: &str = r#"{
    "kind": "random_forest",
    "n_features": 2,
    "trees": [
        {"nodes": [
            {"feature": 0, "threshold": 5.0, "left": 1, "right": 2, "missing_go_to_left": false},
            {"value": 1.0},
            {"value": 3.0}
        ]},
        {"nodes": [{"value": 2.0}]}
    ]
}"#;

#[test]
fn test_random_forest_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.json");
    fs::write(&path, FOREST).unwrap();

    let model = load_regressor(&path).unwrap();
    let matrix = FeatureMatrix::from_columns(&[vec![1.0, 9.0, f64::NAN], vec![0.0, 0.0, 0.0]]).unwrap();
    let predicted = model.predict(&matrix).unwrap();
    assert_eq!(predicted, vec![1.5, 2.5, 2.5]);
}

#[test]
fn test_linear_artifact_imputes_missing_principal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.json");
    fs::write(&path, principal_linear_artifact()).unwrap();

    let model = load_regressor(&path).unwrap();
    let mut columns = vec![vec![7.0, 7.0]; 25];
    columns.push(vec![12.0, f64::NAN]);
    let predicted = model.predict(&FeatureMatrix::from_columns(&columns).unwrap()).unwrap();
    assert_eq!(predicted, vec![12.0, 0.0]);
}

#[test]
fn test_isolation_forest_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iso.json");
    fs::write(&path, negative_residual_forest_artifact(-5.0)).unwrap();

    let model = load_outlier_scorer(&path).unwrap();
    let scores = model
        .decision_function(&FeatureMatrix::single_column(vec![-50.0, 1.0]))
        .unwrap();
    assert!(scores[0] < -0.1);
    assert!(scores[1] > -0.1);
}

#[test]
fn test_missing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_regressor(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(PipelineError::ModelArtifact { .. })));
}

#[test]
fn test_corrupt_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("truncated.json", "{\"kind\": \"random_forest\", \"trees\": ["),
        ("unknown.json", "{\"kind\": \"gradient_boosting\", \"trees\": []}"),
        ("empty.json", "{\"kind\": \"random_forest\", \"n_features\": 2, \"trees\": []}"),
        (
            "dangling.json",
            "{\"kind\": \"random_forest\", \"n_features\": 1, \"trees\": [{\"nodes\": [{\"feature\": 0, \"left\": 5, \"right\": 6}]}]}",
        ),
    ];
    for (name, content) in cases {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        assert!(
            matches!(load_regressor(&path), Err(PipelineError::ModelArtifact { .. })),
            "{name} loaded"
        );
    }
}

#[test]
fn test_feature_count_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.json");
    fs::write(&path, FOREST).unwrap();

    let model = load_regressor(&path).unwrap();
    let result = model.predict(&FeatureMatrix::single_column(vec![1.0]));
    assert!(matches!(result, Err(PipelineError::ModelArtifact { path: p, .. }) if p == path));
}

#[test]
fn test_outlier_scorer_kind_is_checked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf-as-iso.json");
    fs::write(&path, FOREST).unwrap();
    assert!(matches!(load_outlier_scorer(&path), Err(PipelineError::ModelArtifact { .. })));
}
