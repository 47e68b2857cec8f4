//! Diagnosis-baseline (TMEAN) anomaly scoring for inpatient claims.
//!
//! Builds per-diagnosis-code mean baselines of length of stay and total
//! charge from a SQLite claims store, predicts the expected measurement of
//! each claim from those baselines, scores the residual with an outlier
//! model and records suspicious claims in a fraud ledger.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod estimator;
pub mod models;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{DuplicatePolicy, PipelineConfig};
pub use error::{PipelineError, Result};
pub use models::{Claim, DiagnosisBaseline, FraudRecord, MeasurementDomain};
pub use store::ClaimStore;

// Pipeline steps
pub use algorithm::normalize::normalize;
pub use algorithm::pipeline::{DomainRun, build_baselines, run, score_domain, score_domain_with_artifacts};
pub use algorithm::statistics::{BaselineSummary, ScoringSummary};

// Estimators
pub use estimator::{FeatureMatrix, OutlierScorer, Regressor};

// Arrow types
pub use arrow::record_batch::RecordBatch;
