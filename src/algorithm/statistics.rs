//! Run statistics and summaries
//!
//! Each pipeline step reports what it did through one of these summaries;
//! the binary prints them and the library logs them.

use std::fmt::Write as _;

use crate::models::domain::MeasurementDomain;

/// What a baseline build saw and produced
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSummary {
    /// Domain the baselines were built for
    pub domain: MeasurementDomain,
    /// Claims after deduplication
    pub claim_count: usize,
    /// Rows dropped as repeated claim identifiers
    pub duplicates_dropped: usize,
    /// Claims whose measurement could not be derived
    pub missing_measurement_count: usize,
    /// Distinct principal codes with a baseline
    pub principal_code_count: usize,
    /// Distinct secondary codes with a baseline
    pub secondary_code_count: usize,
}

impl BaselineSummary {
    /// Multi-line human-readable summary
    #[must_use]
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();
        let _ = writeln!(summary, "Baselines ({}):", self.domain);
        let _ = writeln!(summary, "  Claims: {}", self.claim_count);
        let _ = writeln!(summary, "  Duplicate Rows Dropped: {}", self.duplicates_dropped);
        let _ = writeln!(summary, "  Claims Without Measurement: {}", self.missing_measurement_count);
        let _ = writeln!(summary, "  Principal Codes: {}", self.principal_code_count);
        let _ = writeln!(summary, "  Secondary Codes: {}", self.secondary_code_count);
        summary
    }
}

/// What a scoring pass did
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSummary {
    /// Domain that was scored
    pub domain: MeasurementDomain,
    /// Claims scored in this pass
    pub claims_scored: usize,
    /// Claims recorded in the fraud ledger
    pub claims_flagged: usize,
    /// Threshold the outlier scores were compared with
    pub fraud_threshold: f64,
    /// Mean of |observed - predicted|
    pub mean_abs_residual: Option<f64>,
    /// Lowest outlier score of the pass
    pub min_score: Option<f64>,
}

impl ScoringSummary {
    /// Summary of a pass that had nothing to score
    #[must_use]
    pub const fn empty(domain: MeasurementDomain, fraud_threshold: f64) -> Self {
        Self {
            domain,
            claims_scored: 0,
            claims_flagged: 0,
            fraud_threshold,
            mean_abs_residual: None,
            min_score: None,
        }
    }

    /// Build a summary from the residuals and outlier scores of a pass
    #[must_use]
    pub fn from_scores(
        domain: MeasurementDomain,
        fraud_threshold: f64,
        residuals: &[f64],
        scores: &[f64],
        claims_flagged: usize,
    ) -> Self {
        let mean_abs_residual = if residuals.is_empty() {
            None
        } else {
            Some(residuals.iter().map(|r| r.abs()).sum::<f64>() / residuals.len() as f64)
        };
        let min_score = scores.iter().copied().reduce(f64::min);
        Self {
            domain,
            claims_scored: scores.len(),
            claims_flagged,
            fraud_threshold,
            mean_abs_residual,
            min_score,
        }
    }

    /// Multi-line human-readable summary
    #[must_use]
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();
        let _ = writeln!(summary, "Scoring ({}):", self.domain);
        let _ = writeln!(summary, "  Claims Scored: {}", self.claims_scored);
        let _ = writeln!(
            summary,
            "  Claims Flagged: {} (threshold {})",
            self.claims_flagged, self.fraud_threshold
        );
        if self.claims_scored > 0 {
            let flagged_pct = self.claims_flagged as f64 / self.claims_scored as f64 * 100.0;
            let _ = writeln!(summary, "  Flagged Share: {flagged_pct:.1}%");
        }
        if let Some(residual) = self.mean_abs_residual {
            let _ = writeln!(summary, "  Mean Absolute Residual: {residual:.2}");
        }
        if let Some(min) = self.min_score {
            let _ = writeln!(summary, "  Lowest Outlier Score: {min:.4}");
        }
        summary
    }
}
