//! Isolation-forest outlier scorer
//!
//! Anomalies are isolated by fewer random splits than normal points. For a
//! sample `x` the anomaly score is `2^(-E[h(x)] / c(max_samples))`, where
//! `h(x)` is the leaf depth plus the expected remaining path length
//! `c(n)` of the leaf's training samples. The decision function is the
//! negated score shifted by the fitted offset, so negative values mark
//! outliers.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::estimator::matrix::FeatureMatrix;
use crate::estimator::tree::DecisionTree;
use crate::estimator::OutlierScorer;

/// Euler-Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Offset used when the model was fitted without a contamination estimate
const DEFAULT_OFFSET: f64 = -0.5;

const fn default_offset() -> f64 {
    DEFAULT_OFFSET
}

/// Average path length of an unsuccessful binary-search-tree lookup over `n` samples
#[must_use]
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Fitted isolation forest
#[derive(Debug, Clone, Deserialize)]
pub struct IsolationForest {
    /// Number of input features
    pub n_features: usize,
    /// Sub-sample size each tree was grown on
    pub max_samples: usize,
    /// Shift applied to the negated anomaly score
    #[serde(default = "default_offset")]
    pub offset: f64,
    /// Fitted isolation trees
    pub trees: Vec<DecisionTree>,
    /// Artifact the model was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

impl IsolationForest {
    /// Check the ensemble structure
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("isolation forest has no trees".to_string());
        }
        if self.max_samples < 2 {
            return Err(format!("max_samples must be at least 2, got {}", self.max_samples));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    /// Negated anomaly score in [-1, 0]; lower is more anomalous
    pub fn score_samples(&self, samples: &FeatureMatrix) -> Result<Vec<f64>> {
        if samples.cols() != self.n_features {
            return Err(PipelineError::artifact(
                &self.source,
                format!(
                    "model expects {} features, got {}",
                    self.n_features,
                    samples.cols()
                ),
            ));
        }
        if let Some(row) = samples.iter_rows().position(|r| r.iter().any(|v| !v.is_finite())) {
            return Err(PipelineError::InvalidData(format!(
                "outlier scoring input row {row} is not finite"
            )));
        }

        let normalizer = self.trees.len() as f64 * average_path_length(self.max_samples);
        Ok(samples
            .iter_rows()
            .map(|row| {
                let depths: f64 = self
                    .trees
                    .iter()
                    .map(|tree| {
                        let (leaf, depth) = tree.leaf(row);
                        depth as f64 + average_path_length(leaf.n_node_samples)
                    })
                    .sum();
                -(2.0_f64).powf(-depths / normalizer)
            })
            .collect())
    }
}

impl OutlierScorer for IsolationForest {
    fn decision_function(&self, samples: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(self
            .score_samples(samples)?
            .into_iter()
            .map(|s| s - self.offset)
            .collect())
    }
}
