//! Arrow data handling utilities
//!
//! Helpers for pulling typed columns out of the feature table.

pub mod array_utils;

// Re-export commonly used functions for convenience
pub use array_utils::{downcast_array, float64_column, get_column_by_name, nan_filled, string_column};
