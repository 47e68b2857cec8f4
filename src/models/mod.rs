//! Domain models for claims scoring
//!
//! This module contains the entities the pipeline works on: claims,
//! measurement domains, diagnosis-code baselines and fraud ledger records.

pub mod baseline;
pub mod claim;
pub mod domain;
pub mod fraud;
pub mod schema;

pub use baseline::{BaselineKind, DiagnosisBaseline};
pub use claim::{Claim, SECONDARY_SLOTS};
pub use domain::{MeasurementDomain, PredictionWriteMode};
pub use fraud::FraudRecord;
