//! Fraud score normalization
//!
//! Outlier models report a score in [-1, 1] where more negative means more
//! anomalous. Consumers see a 0 to 100 severity instead.

use crate::error::{PipelineError, Result};

/// Map an outlier score in [-1, 1] to a 0 to 100 fraud score
///
/// Non-negative scores map to 0, negative scores map linearly to
/// `-100 * value`. Values outside [-1, 1] (and NaN) are rejected.
pub fn normalize(value: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(PipelineError::ScoreOutOfRange(value));
    }

    if value >= 0.0 { Ok(0.0) } else { Ok(-100.0 * value) }
}
