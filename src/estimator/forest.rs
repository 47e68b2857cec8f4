//! Random-forest regressor

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::estimator::matrix::FeatureMatrix;
use crate::estimator::tree::DecisionTree;
use crate::estimator::Regressor;

/// Averaging ensemble of regression trees
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForestRegressor {
    /// Number of input features
    pub n_features: usize,
    /// Fitted trees
    pub trees: Vec<DecisionTree>,
    /// Artifact the model was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

impl RandomForestRegressor {
    /// Check the ensemble structure
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Regressor for RandomForestRegressor {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if features.cols() != self.n_features {
            return Err(PipelineError::artifact(
                &self.source,
                format!(
                    "model expects {} features, got {}",
                    self.n_features,
                    features.cols()
                ),
            ));
        }
        let n_trees = self.trees.len() as f64;
        Ok(features
            .iter_rows()
            .map(|row| self.trees.iter().map(|t| t.leaf(row).0.value).sum::<f64>() / n_trees)
            .collect())
    }
}
