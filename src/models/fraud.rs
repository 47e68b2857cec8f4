//! Fraud ledger entries

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Timestamp format of the `detected_at` column (matches SQLite `CURRENT_TIMESTAMP`)
pub const DETECTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A claim flagged by one of the scoring models
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudRecord {
    /// Flagged claim
    pub claim_id: String,
    /// Model that flagged it
    pub model_name: String,
    /// Normalized severity, 0 to 100
    pub score: f64,
    /// When the claim was flagged
    pub detected_at: NaiveDateTime,
}

impl FraudRecord {
    /// Create a record stamped with the current UTC time
    #[must_use]
    pub fn new(claim_id: impl Into<String>, model_name: impl Into<String>, score: f64) -> Self {
        Self::detected_at(claim_id, model_name, score, Utc::now())
    }

    /// Create a record with an explicit detection time
    #[must_use]
    pub fn detected_at(
        claim_id: impl Into<String>,
        model_name: impl Into<String>,
        score: f64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            claim_id: claim_id.into(),
            model_name: model_name.into(),
            score,
            detected_at: at.naive_utc(),
        }
    }

    /// `detected_at` rendered for the store
    #[must_use]
    pub fn detected_at_string(&self) -> String {
        self.detected_at.format(DETECTED_AT_FORMAT).to_string()
    }
}
