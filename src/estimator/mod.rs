//! Pre-trained estimators
//!
//! The scoring pipeline depends on two capabilities: a regressor that
//! predicts the expected measurement from the baseline features, and an
//! outlier scorer that rates residuals. Both are loaded from JSON artifacts
//! trained and versioned outside this crate.

pub mod artifact;
pub mod forest;
pub mod isolation;
pub mod linear;
pub mod matrix;
pub mod tree;

use crate::error::Result;

pub use artifact::{OutlierArtifact, RegressorArtifact, load_outlier_scorer, load_regressor};
pub use forest::RandomForestRegressor;
pub use isolation::IsolationForest;
pub use linear::LinearRegressor;
pub use matrix::FeatureMatrix;

/// Predicts one value per row of a feature matrix
pub trait Regressor {
    /// Predict the expected measurement for every row
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;
}

/// Scores how anomalous each row of a matrix is
///
/// Scores are conventionally in [-1, 1]; more negative is more anomalous.
pub trait OutlierScorer {
    /// Outlier score for every row
    fn decision_function(&self, samples: &FeatureMatrix) -> Result<Vec<f64>>;
}

impl<T: Regressor + ?Sized> Regressor for Box<T> {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        (**self).predict(features)
    }
}

impl<T: OutlierScorer + ?Sized> OutlierScorer for Box<T> {
    fn decision_function(&self, samples: &FeatureMatrix) -> Result<Vec<f64>> {
        (**self).decision_function(samples)
    }
}
