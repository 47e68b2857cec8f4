//! Anomaly scoring
//!
//! Predicts the expected measurement from the baseline features, takes the
//! signed residual against the observed measurement, rates the residual
//! with the outlier scorer and flags claims scoring below the threshold.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::record_batch::RecordBatch;
use chrono::Utc;

use crate::algorithm::normalize::normalize;
use crate::algorithm::statistics::ScoringSummary;
use crate::error::{PipelineError, Result};
use crate::estimator::{FeatureMatrix, OutlierScorer, Regressor};
use crate::models::claim::CLAIM_ID_COLUMN;
use crate::models::domain::MeasurementDomain;
use crate::models::fraud::FraudRecord;
use crate::models::schema::{model_feature_columns, prediction_schema};
use crate::utils::arrow::{float64_column, nan_filled, string_column};

/// Result of scoring one feature table
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    /// Feature table with prediction and outlier score columns
    pub predictions: RecordBatch,
    /// Ledger entries for the flagged claims
    pub fraud_records: Vec<FraudRecord>,
    /// Pass statistics
    pub summary: ScoringSummary,
}

/// Build the model input matrix from the feature table; null baselines become `NaN`
pub fn feature_matrix(features: &RecordBatch) -> Result<FeatureMatrix> {
    let columns = model_feature_columns()
        .iter()
        .map(|name| float64_column(features, name).map(nan_filled))
        .collect::<Result<Vec<_>>>()?;
    FeatureMatrix::from_columns(&columns)
}

fn check_len(what: &str, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(PipelineError::InvalidData(format!(
            "{what} returned {got} values for {expected} claims"
        )))
    }
}

/// Score an assembled feature table
///
/// Flagged claims (`outlier score < fraud_threshold`) carry the normalized
/// 0 to 100 score. Every flagged score is normalized before the outcome is
/// returned, so an out-of-range model output fails the whole pass.
pub fn score_features<R, S>(
    domain: MeasurementDomain,
    features: &RecordBatch,
    regressor: &R,
    outlier_scorer: &S,
    fraud_threshold: f64,
) -> Result<ScoringOutcome>
where
    R: Regressor + ?Sized,
    S: OutlierScorer + ?Sized,
{
    let rows = features.num_rows();

    let matrix = feature_matrix(features)?;
    let predicted = regressor.predict(&matrix)?;
    check_len("regressor", predicted.len(), rows)?;

    let observed = nan_filled(float64_column(features, domain.measurement_column())?);
    let residuals: Vec<f64> = observed
        .iter()
        .zip(&predicted)
        .map(|(actual, expected)| actual - expected)
        .collect();

    let scores = outlier_scorer.decision_function(&FeatureMatrix::single_column(residuals.clone()))?;
    check_len("outlier scorer", scores.len(), rows)?;

    let claim_ids = string_column(features, CLAIM_ID_COLUMN)?;
    let detected_at = Utc::now();
    let mut fraud_records = Vec::new();
    for (row, score) in scores.iter().enumerate() {
        if *score < fraud_threshold {
            fraud_records.push(FraudRecord::detected_at(
                claim_ids.value(row),
                domain.model_name(),
                normalize(*score)?,
                detected_at,
            ));
        }
    }

    let mut columns: Vec<ArrayRef> = features.columns().to_vec();
    columns.push(Arc::new(Float64Array::from(predicted)));
    columns.push(Arc::new(Float64Array::from(scores.clone())));
    let predictions = RecordBatch::try_new(prediction_schema(domain), columns)?;

    let summary = ScoringSummary::from_scores(
        domain,
        fraud_threshold,
        &residuals,
        &scores,
        fraud_records.len(),
    );

    Ok(ScoringOutcome {
        predictions,
        fraud_records,
        summary,
    })
}
