//! Configuration for the claims scoring pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::util::safe_read_to_string;
use crate::error::{PipelineError, Result};

/// Default fraud threshold applied to raw outlier scores
pub const DEFAULT_FRAUD_THRESHOLD: f64 = -0.1;

/// Default store path
pub const DEFAULT_DB_PATH: &str = "fraud.db";

/// Default model artifact directory
pub const DEFAULT_MODELS_DIR: &str = "models";

/// What to do when `cms_claims` holds the same claim identifier twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first row in store order and drop the rest
    #[default]
    FirstWins,
    /// Fail the run
    Reject,
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path of the SQLite store
    pub db_path: PathBuf,
    /// Directory holding the model artifacts
    pub models_dir: PathBuf,
    /// Claims whose raw outlier score falls below this value are flagged
    pub fraud_threshold: f64,
    /// Handling of duplicate claim identifiers
    pub duplicate_policy: DuplicatePolicy,
    /// Draw progress bars for long-running steps
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            fraud_threshold: DEFAULT_FRAUD_THRESHOLD,
            duplicate_policy: DuplicatePolicy::default(),
            show_progress: false,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "pipeline configuration")?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the store path
    #[must_use]
    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Set the model artifact directory
    #[must_use]
    pub fn with_models_dir(mut self, models_dir: impl Into<PathBuf>) -> Self {
        self.models_dir = models_dir.into();
        self
    }

    /// Set the fraud threshold
    #[must_use]
    pub const fn with_fraud_threshold(mut self, fraud_threshold: f64) -> Self {
        self.fraud_threshold = fraud_threshold;
        self
    }

    /// Set the duplicate claim policy
    #[must_use]
    pub const fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Enable or disable progress bars
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check that the configuration is usable
    ///
    /// The threshold is compared with outlier scores, which live in [-1, 1].
    pub fn validate(&self) -> Result<()> {
        if !self.fraud_threshold.is_finite() || !(-1.0..=1.0).contains(&self.fraud_threshold) {
            return Err(PipelineError::Config(format!(
                "fraud threshold {} must be a number within [-1, 1]",
                self.fraud_threshold
            )));
        }
        Ok(())
    }
}
