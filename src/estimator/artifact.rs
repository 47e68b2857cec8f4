//! Loading estimator artifacts
//!
//! Artifacts are JSON documents tagged with their model `kind`. A missing,
//! unreadable or structurally invalid artifact is fatal for the run.

use std::path::Path;

use serde::Deserialize;

use crate::error::util::read_artifact;
use crate::error::{PipelineError, Result};
use crate::estimator::forest::RandomForestRegressor;
use crate::estimator::isolation::IsolationForest;
use crate::estimator::linear::LinearRegressor;
use crate::estimator::{OutlierScorer, Regressor};

/// Regressor artifact document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    /// Random-forest regressor
    RandomForest(RandomForestRegressor),
    /// Linear regressor
    Linear(LinearRegressor),
}

/// Outlier-scorer artifact document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlierArtifact {
    /// Isolation forest
    IsolationForest(IsolationForest),
}

fn parse<T: for<'de> Deserialize<'de>>(path: &Path, purpose: &str) -> Result<T> {
    let content = read_artifact(path, purpose)?;
    serde_json::from_str(&content)
        .map_err(|e| PipelineError::artifact(path, format!("malformed {purpose}: {e}")))
}

/// Load a regressor artifact
pub fn load_regressor(path: &Path) -> Result<Box<dyn Regressor>> {
    log::info!("Loading regressor from {}", path.display());
    let artifact: RegressorArtifact = parse(path, "regressor artifact")?;
    let model: Box<dyn Regressor> = match artifact {
        RegressorArtifact::RandomForest(mut model) => {
            model.validate().map_err(|e| PipelineError::artifact(path, e))?;
            model.source = path.to_path_buf();
            Box::new(model)
        }
        RegressorArtifact::Linear(mut model) => {
            model.validate().map_err(|e| PipelineError::artifact(path, e))?;
            model.source = path.to_path_buf();
            Box::new(model)
        }
    };
    Ok(model)
}

/// Load an outlier-scorer artifact
pub fn load_outlier_scorer(path: &Path) -> Result<Box<dyn OutlierScorer>> {
    log::info!("Loading outlier scorer from {}", path.display());
    let artifact: OutlierArtifact = parse(path, "outlier scorer artifact")?;
    let model: Box<dyn OutlierScorer> = match artifact {
        OutlierArtifact::IsolationForest(mut model) => {
            model.validate().map_err(|e| PipelineError::artifact(path, e))?;
            model.source = path.to_path_buf();
            Box::new(model)
        }
    };
    Ok(model)
}
