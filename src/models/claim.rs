//! Claim entity model
//!
//! A claim row as the pipeline sees it: identifier, principal diagnosis code,
//! the 25 positional secondary diagnosis codes and one derived measurement.

/// Number of secondary diagnosis slots on a claim
pub const SECONDARY_SLOTS: usize = 25;

/// Claim identifier column
pub const CLAIM_ID_COLUMN: &str = "CLM_ID";

/// Principal diagnosis code column
pub const PRINCIPAL_CODE_COLUMN: &str = "PRNCPAL_DGNS_CD";

/// Principal diagnosis baseline column in feature and baseline tables
pub const PRINCIPAL_TMEAN_COLUMN: &str = "PRNCPAL_DGNS_CD_TMEAN";

/// Sentinel string that marks an absent code in the source data
pub const MISSING_CODE_SENTINEL: &str = "None";

/// Name of secondary diagnosis slot `slot` (0-based), e.g. `ICD_DGNS_CD1`
#[must_use]
pub fn secondary_code_column(slot: usize) -> String {
    format!("ICD_DGNS_CD{}", slot + 1)
}

/// Name of the resolved baseline column for secondary slot `slot` (0-based)
#[must_use]
pub fn secondary_tmean_column(slot: usize) -> String {
    format!("ICD_DGNS_CD{}_TMEAN", slot + 1)
}

/// All secondary diagnosis code columns in slot order
#[must_use]
pub fn secondary_code_columns() -> Vec<String> {
    (0..SECONDARY_SLOTS).map(secondary_code_column).collect()
}

/// Normalize a raw diagnosis code
///
/// Trims whitespace; empty strings and the `"None"` sentinel become `None`.
#[must_use]
pub fn clean_code(raw: Option<&str>) -> Option<String> {
    let code = raw?.trim();
    if code.is_empty() || code == MISSING_CODE_SENTINEL {
        None
    } else {
        Some(code.to_string())
    }
}

/// A claim with its diagnosis codes and derived measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Claim identifier
    pub claim_id: String,
    /// Principal diagnosis code
    pub principal_code: Option<String>,
    /// Secondary diagnosis codes by slot
    pub secondary_codes: [Option<String>; SECONDARY_SLOTS],
    /// Observed measurement (days in claim or total charge)
    pub measurement: Option<f64>,
}

impl Claim {
    /// Create a claim without secondary codes
    #[must_use]
    pub fn new(claim_id: impl Into<String>, principal_code: Option<&str>, measurement: Option<f64>) -> Self {
        Self {
            claim_id: claim_id.into(),
            principal_code: clean_code(principal_code),
            secondary_codes: std::array::from_fn(|_| None),
            measurement,
        }
    }

    /// Set the code of one secondary slot (0-based)
    ///
    /// Slots past the last one are ignored.
    #[must_use]
    pub fn with_secondary(mut self, slot: usize, code: Option<&str>) -> Self {
        if let Some(entry) = self.secondary_codes.get_mut(slot) {
            *entry = clean_code(code);
        }
        self
    }

    /// Distinct populated secondary codes, in first-seen slot order
    pub fn distinct_secondary_codes(&self) -> impl Iterator<Item = &str> {
        let mut seen: Vec<&str> = Vec::with_capacity(SECONDARY_SLOTS);
        self.secondary_codes.iter().flatten().filter_map(move |code| {
            if seen.contains(&code.as_str()) {
                None
            } else {
                seen.push(code.as_str());
                Some(code.as_str())
            }
        })
    }
}
