//! Diagnosis-code baselines
//!
//! A baseline maps a diagnosis code to the mean of a measurement ("TMEAN")
//! over the claims carrying that code.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::models::claim::{PRINCIPAL_CODE_COLUMN, PRINCIPAL_TMEAN_COLUMN};

/// Secondary baseline key column
pub const SECONDARY_CODE_COLUMN: &str = "SECONDARY_DGNS_CD";

/// Secondary baseline value column
pub const SECONDARY_TMEAN_COLUMN: &str = "SECONDARY_DGNS_TMEAN";

/// Which diagnosis position a baseline was computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineKind {
    /// Principal diagnosis code
    Principal,
    /// Any of the secondary diagnosis slots
    Secondary,
}

impl BaselineKind {
    /// Key column of the persisted baseline table
    #[must_use]
    pub const fn code_column(self) -> &'static str {
        match self {
            Self::Principal => PRINCIPAL_CODE_COLUMN,
            Self::Secondary => SECONDARY_CODE_COLUMN,
        }
    }

    /// Value column of the persisted baseline table
    #[must_use]
    pub const fn mean_column(self) -> &'static str {
        match self {
            Self::Principal => PRINCIPAL_TMEAN_COLUMN,
            Self::Secondary => SECONDARY_TMEAN_COLUMN,
        }
    }
}

/// Mean measurement per diagnosis code
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisBaseline {
    kind: BaselineKind,
    means: FxHashMap<String, f64>,
}

impl DiagnosisBaseline {
    /// Create a baseline from precomputed means
    #[must_use]
    pub fn from_means(kind: BaselineKind, means: FxHashMap<String, f64>) -> Self {
        Self { kind, means }
    }

    /// Which diagnosis position this baseline covers
    #[must_use]
    pub const fn kind(&self) -> BaselineKind {
        self.kind
    }

    /// Mean for `code`, if the code was observed
    #[must_use]
    pub fn get(&self, code: &str) -> Option<f64> {
        self.means.get(code).copied()
    }

    /// Resolve an optional code; absent and unmatched codes give `None`
    #[must_use]
    pub fn resolve(&self, code: Option<&str>) -> Option<f64> {
        code.and_then(|c| self.get(c))
    }

    /// Number of codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.means.len()
    }

    /// Whether no code has a baseline
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Entries sorted by code
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&str, f64)> {
        self.means
            .iter()
            .map(|(code, mean)| (code.as_str(), *mean))
            .sorted_unstable_by(|a, b| a.0.cmp(b.0))
            .collect()
    }
}
