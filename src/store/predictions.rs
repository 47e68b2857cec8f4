//! Predictions tables
//!
//! Arrow batches are written column-for-column: `Utf8` becomes TEXT and
//! `Float64` becomes REAL, with NaN stored as NULL.

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rusqlite::{Connection, params_from_iter};
use rusqlite::types::Value;
use rustc_hash::FxHashSet;

use crate::error::{PipelineError, Result};
use crate::models::claim::CLAIM_ID_COLUMN;
use crate::models::domain::{MeasurementDomain, PredictionWriteMode};
use crate::models::schema::prediction_schema;
use crate::store::{ClaimStore, quote_ident, value_to_key};

fn sql_type(data_type: &DataType) -> Result<&'static str> {
    match data_type {
        DataType::Utf8 => Ok("TEXT"),
        DataType::Float64 => Ok("REAL"),
        other => Err(PipelineError::InvalidData(format!(
            "cannot store Arrow type {other} in a predictions table"
        ))),
    }
}

fn create_table_sql(table: &str, schema: &Schema, if_not_exists: bool) -> Result<String> {
    let columns = schema
        .fields()
        .iter()
        .map(|field| Ok(format!("{} {}", quote_ident(field.name()), sql_type(field.data_type())?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "CREATE TABLE {}{} ({});",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_ident(table),
        columns.iter().join(", ")
    ))
}

fn cell_value(column: &ArrayRef, row: usize) -> Result<Value> {
    if column.is_null(row) {
        return Ok(Value::Null);
    }
    match column.data_type() {
        DataType::Utf8 => {
            let array = column
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| PipelineError::InvalidData("expected Utf8 array".to_string()))?;
            Ok(Value::Text(array.value(row).to_string()))
        }
        DataType::Float64 => {
            let array = column
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| PipelineError::InvalidData("expected Float64 array".to_string()))?;
            let value = array.value(row);
            Ok(if value.is_nan() { Value::Null } else { Value::Real(value) })
        }
        other => Err(PipelineError::InvalidData(format!(
            "cannot store Arrow type {other} in a predictions table"
        ))),
    }
}

impl ClaimStore {
    /// Drop and recreate the domain's predictions table with the fixed schema
    pub fn create_predictions_table(&self, domain: MeasurementDomain) -> Result<()> {
        let table = domain.predictions_table();
        self.drop_table(table)?;
        self.conn
            .execute_batch(&create_table_sql(table, &prediction_schema(domain), false)?)?;
        Ok(())
    }

    /// Claim ids already present in the domain's predictions table
    pub fn scored_claim_ids(&self, domain: MeasurementDomain) -> Result<FxHashSet<String>> {
        let table = domain.predictions_table();
        if !self.table_exists(table)? {
            return Ok(FxHashSet::default());
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {}",
            quote_ident(CLAIM_ID_COLUMN),
            quote_ident(table)
        ))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, Value>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .iter()
            .filter_map(value_to_key)
            .collect();
        Ok(ids)
    }
}

/// Write a scored batch according to the domain's write mode
///
/// Replace mode recreates the table from the batch schema. Append mode
/// creates the fixed-schema table if it is missing and inserts by column
/// name.
pub(super) fn insert_predictions(
    conn: &Connection,
    domain: MeasurementDomain,
    batch: &RecordBatch,
) -> Result<usize> {
    let table = domain.predictions_table();
    let schema = batch.schema();

    match domain.write_mode() {
        PredictionWriteMode::Replace => {
            conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", quote_ident(table)))?;
            conn.execute_batch(&create_table_sql(table, &schema, false)?)?;
        }
        PredictionWriteMode::Append => {
            conn.execute_batch(&create_table_sql(table, &prediction_schema(domain), true)?)?;
        }
    }

    let columns = schema.fields().iter().map(|f| quote_ident(f.name())).join(", ");
    let placeholders = (1..=schema.fields().len()).map(|i| format!("?{i}")).join(", ");
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_ident(table),
    ))?;
    for row in 0..batch.num_rows() {
        let values = batch
            .columns()
            .iter()
            .map(|column| cell_value(column, row))
            .collect::<Result<Vec<_>>>()?;
        stmt.execute(params_from_iter(values))?;
    }
    Ok(batch.num_rows())
}
