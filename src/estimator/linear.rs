//! Linear regressor with per-feature imputation

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::estimator::matrix::FeatureMatrix;
use crate::estimator::Regressor;

/// `intercept + coefficients · x`, with `NaN` features replaced first
#[derive(Debug, Clone, Deserialize)]
pub struct LinearRegressor {
    /// One weight per feature
    pub coefficients: Vec<f64>,
    /// Constant term
    #[serde(default)]
    pub intercept: f64,
    /// Replacement for a missing feature; zero when absent
    #[serde(default)]
    pub impute: Option<Vec<f64>>,
    /// Artifact the model was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

impl LinearRegressor {
    /// Check that imputation values line up with the coefficients
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        match &self.impute {
            Some(impute) if impute.len() != self.coefficients.len() => Err(format!(
                "{} imputation values for {} coefficients",
                impute.len(),
                self.coefficients.len()
            )),
            _ => Ok(()),
        }
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if features.cols() != self.coefficients.len() {
            return Err(PipelineError::artifact(
                &self.source,
                format!(
                    "model expects {} features, got {}",
                    self.coefficients.len(),
                    features.cols()
                ),
            ));
        }
        Ok(features
            .iter_rows()
            .map(|row| {
                row.iter()
                    .zip(&self.coefficients)
                    .enumerate()
                    .map(|(i, (x, w))| {
                        let x = if x.is_nan() {
                            self.impute.as_ref().map_or(0.0, |imp| imp[i])
                        } else {
                            *x
                        };
                        x * w
                    })
                    .sum::<f64>()
                    + self.intercept
            })
            .collect())
    }
}
