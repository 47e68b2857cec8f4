//! Claim scoring algorithms
//!
//! This module contains the steps of the TMEAN pipeline: measurement
//! derivation, diagnosis baselines, feature assembly, anomaly scoring and
//! score normalization, plus the per-domain orchestration tying them to
//! the store.

pub mod baseline;
pub mod dedup;
pub mod features;
pub mod measurement;
pub mod normalize;
pub mod pipeline;
pub mod scorer;
pub mod statistics;
