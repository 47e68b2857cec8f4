//! SQLite persistence layer.
//!
//! `ClaimStore` is the explicit store handle every pipeline step receives.
//! Only this module talks to the database; the algorithm modules work on
//! in-memory claims, baselines and Arrow batches.

pub mod baselines;
pub mod claims;
pub mod fraud;
pub mod predictions;

use std::path::Path;

use arrow::record_batch::RecordBatch;
use rusqlite::Connection;
use rusqlite::types::Value;

use crate::error::Result;
use crate::models::domain::MeasurementDomain;
use crate::models::fraud::FraudRecord;

/// Source claims table written by ingestion
pub const CLAIMS_TABLE: &str = "cms_claims";

/// Handle on the relational store
pub struct ClaimStore {
    conn: Connection,
}

impl ClaimStore {
    /// Open (or create) the store at `path`
    pub fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening claim store {}", path.display());
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (used in tests)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Underlying connection, for ingestion and inspection
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether a table exists
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Column names of a table, empty when the table does not exist
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Number of rows in a table
    pub fn row_count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Write one scoring pass: the predictions batch and its flagged claims
    ///
    /// Both land in a single transaction. If either write fails, neither
    /// the predictions table nor the ledger changes.
    ///
    /// # Returns
    /// `(predictions written, ledger rows appended)`
    pub fn persist_scoring_pass(
        &self,
        domain: MeasurementDomain,
        predictions: &RecordBatch,
        flagged: &[FraudRecord],
    ) -> Result<(usize, usize)> {
        let tx = self.conn.unchecked_transaction()?;
        let written = predictions::insert_predictions(&tx, domain, predictions)?;
        let appended = fraud::insert_fraud_records(&tx, flagged)?;
        tx.commit()?;
        Ok((written, appended))
    }

    fn drop_table(&self, table: &str) -> Result<()> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {};", quote_ident(table)))?;
        Ok(())
    }
}

/// Quote an SQL identifier
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a stored value as a key string
///
/// Identifiers and codes may come back as text, integers or reals depending
/// on how the table was ingested. Integral reals lose their fraction so that
/// `1.0` and `1` name the same claim.
#[must_use]
pub fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            Some(format!("{f:.0}"))
        }
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s.trim().to_string()),
    }
}

/// Read a stored value as a number
#[must_use]
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(f) => Some(*f),
        Value::Text(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}
