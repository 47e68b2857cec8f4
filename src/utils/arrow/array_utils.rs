//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely extracting typed
//! columns from record batches with clear error messages.

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;

use crate::error::{PipelineError, Result};

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        PipelineError::InvalidData(format!(
            "column '{column_name}' is {}, expected {expected_type_name}",
            array.data_type()
        ))
    })
}

/// Get a column from a record batch by name
///
/// # Errors
/// Returns an error if the column does not exist
pub fn get_column_by_name<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(column_name)
        .map_err(|_| PipelineError::ColumnNotFound {
            column: column_name.to_string(),
        })?;
    Ok(batch.column(idx))
}

/// Get a `Float64` column by name
pub fn float64_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a Float64Array> {
    downcast_array::<Float64Array>(get_column_by_name(batch, column_name)?, column_name, "Float64")
}

/// Get a `Utf8` column by name
pub fn string_column<'a>(batch: &'a RecordBatch, column_name: &str) -> Result<&'a StringArray> {
    downcast_array::<StringArray>(get_column_by_name(batch, column_name)?, column_name, "Utf8")
}

/// Values of a `Float64` column with nulls as `NaN`
#[must_use]
pub fn nan_filled(array: &Float64Array) -> Vec<f64> {
    (0..array.len())
        .map(|i| if array.is_null(i) { f64::NAN } else { array.value(i) })
        .collect()
}
