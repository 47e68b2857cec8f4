//! Tests for the fraud score normalizer

use claims_tmean::{PipelineError, normalize};

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn test_reference_scores() {
    assert_close(normalize(-1.0).unwrap(), 100.0);
    assert_close(normalize(0.0).unwrap(), 0.0);
    assert_close(normalize(0.5).unwrap(), 0.0);
    assert_close(normalize(-0.72).unwrap(), 72.0);
}

#[test]
fn test_monotonic_over_negative_range() {
    let scores: Vec<f64> = [-0.9, -0.6, -0.3, -0.1]
        .iter()
        .map(|v| normalize(*v).unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_out_of_range_is_rejected() {
    for value in [-1.5, 1.000_001, f64::NEG_INFINITY, f64::NAN] {
        assert!(
            matches!(normalize(value), Err(PipelineError::ScoreOutOfRange(_))),
            "{value} was accepted"
        );
    }
}
