//! Measurement domains
//!
//! The pipeline runs once per measurement domain. A domain fixes which
//! measurement is derived from a claim, which tables hold its baselines and
//! predictions, and which model artifacts score it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::claim::secondary_code_columns;

/// How a scoring pass writes its predictions table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionWriteMode {
    /// Drop and recreate the table on every pass
    Replace,
    /// Append to a pre-created table, skipping claims already present
    Append,
}

/// The measurement a baseline and model are built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementDomain {
    /// Days between claim from- and through-dates
    LengthOfStay,
    /// Total charge amount
    TotalCharge,
}

impl MeasurementDomain {
    /// Every domain, in the order a full run processes them
    pub const ALL: [Self; 2] = [Self::LengthOfStay, Self::TotalCharge];

    /// Short name used on the command line and in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LengthOfStay => "length-of-stay",
            Self::TotalCharge => "total-charge",
        }
    }

    /// Column holding the measurement
    #[must_use]
    pub const fn measurement_column(self) -> &'static str {
        match self {
            Self::LengthOfStay => "CLM_NUM_DAYS",
            Self::TotalCharge => "CLM_TOT_CHRG_AMT",
        }
    }

    /// Columns `cms_claims` must carry for this domain
    ///
    /// Every secondary slot column is required, not only the populated ones.
    #[must_use]
    pub fn required_source_columns(self) -> Vec<String> {
        let inputs: &[&str] = match self {
            Self::LengthOfStay => &["CLM_FROM_DT", "CLM_THRU_DT"],
            Self::TotalCharge => &["CLM_TOT_CHRG_AMT"],
        };
        ["CLM_ID", "PRNCPAL_DGNS_CD"]
            .into_iter()
            .chain(inputs.iter().copied())
            .map(str::to_string)
            .chain(secondary_code_columns())
            .collect()
    }

    /// Per-claim measurement table
    #[must_use]
    pub const fn measurement_table(self) -> &'static str {
        match self {
            Self::LengthOfStay => "inpatient_claims_length",
            Self::TotalCharge => "inpatient_claims_charge",
        }
    }

    /// Principal-code baseline table
    #[must_use]
    pub const fn principal_baseline_table(self) -> &'static str {
        match self {
            Self::LengthOfStay => "inpatient_prncpal_dgns_cd_tmean",
            Self::TotalCharge => "inpatient_costs_prncpal_dgns_cd_tmean",
        }
    }

    /// Secondary-code baseline table
    #[must_use]
    pub const fn secondary_baseline_table(self) -> &'static str {
        match self {
            Self::LengthOfStay => "inpatient_secondary_dgns_cd_tmean",
            Self::TotalCharge => "inpatient_costs_secondary_dgns_cd_tmean",
        }
    }

    /// Predictions table
    #[must_use]
    pub const fn predictions_table(self) -> &'static str {
        match self {
            Self::LengthOfStay => "inpatient_length_of_stay_predictions",
            Self::TotalCharge => "inpatient_total_cost_predictions",
        }
    }

    /// How the predictions table is written
    #[must_use]
    pub const fn write_mode(self) -> PredictionWriteMode {
        match self {
            Self::LengthOfStay => PredictionWriteMode::Replace,
            Self::TotalCharge => PredictionWriteMode::Append,
        }
    }

    /// Model name recorded in the fraud ledger
    #[must_use]
    pub const fn model_name(self) -> &'static str {
        match self {
            Self::LengthOfStay => "iso_diff-length-of-stay",
            Self::TotalCharge => "iso_diff-total-charge",
        }
    }

    /// Column holding the regression prediction
    #[must_use]
    pub fn prediction_column(self) -> String {
        format!("{}_RF_PRED", self.measurement_column())
    }

    /// Column holding the outlier score
    #[must_use]
    pub fn score_column(self) -> String {
        format!("{}_IFOREST_DIFF_SCORE", self.measurement_column())
    }

    /// Regression artifact path under `models_dir`
    #[must_use]
    pub fn regressor_path(self, models_dir: &Path) -> PathBuf {
        models_dir.join(format!("rf-{}.json", self.name()))
    }

    /// Outlier-scorer artifact path under `models_dir`
    #[must_use]
    pub fn outlier_scorer_path(self, models_dir: &Path) -> PathBuf {
        models_dir.join(format!("{}.json", self.model_name()))
    }
}

impl fmt::Display for MeasurementDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
