//! Dense row-major feature matrix

use crate::error::{PipelineError, Result};

/// Row-major matrix of `f64`; missing values are `NaN`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build a matrix from equally long columns
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().position(|c| c.len() != rows) {
            return Err(PipelineError::InvalidData(format!(
                "feature column {bad} has {} rows, expected {rows}",
                columns[bad].len()
            )));
        }

        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            data.extend(columns.iter().map(|column| column[row]));
        }
        Ok(Self { rows, cols, data })
    }

    /// One-feature-per-row matrix
    #[must_use]
    pub fn single_column(values: Vec<f64>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values,
        }
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// One row
    #[must_use]
    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(|i| self.row(i))
    }
}
