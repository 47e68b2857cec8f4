//! Fraud ledger
//!
//! Append-only and shared by every scoring model. The ledger never
//! deduplicates and never range-checks scores.

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{Connection, params};

use crate::error::{PipelineError, Result};
use crate::models::fraud::{DETECTED_AT_FORMAT, FraudRecord};
use crate::store::{ClaimStore, value_to_key};

/// Fraud ledger table
pub const FRAUD_TABLE: &str = "fraud";

const CREATE_FRAUD_TABLE: &str = "CREATE TABLE IF NOT EXISTS fraud (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    CLM_ID TEXT,
    model_name TEXT,
    score REAL,
    detected_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";

/// Append ledger rows on `conn`, creating the ledger first if needed
pub(super) fn insert_fraud_records(conn: &Connection, records: &[FraudRecord]) -> Result<usize> {
    conn.execute_batch(CREATE_FRAUD_TABLE)?;
    let mut stmt = conn.prepare(
        "INSERT INTO fraud (CLM_ID, model_name, score, detected_at) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for record in records {
        stmt.execute(params![
            record.claim_id,
            record.model_name,
            record.score,
            record.detected_at_string()
        ])?;
    }
    Ok(records.len())
}

/// A ledger row as stored, before validation
struct StoredFraudRow {
    id: i64,
    claim_id: Value,
    model_name: Option<String>,
    score: Option<f64>,
    detected_at: Option<String>,
}

impl TryFrom<StoredFraudRow> for FraudRecord {
    type Error = PipelineError;

    fn try_from(row: StoredFraudRow) -> Result<Self> {
        let id = row.id;
        let invalid =
            |what: &str| PipelineError::InvalidData(format!("fraud ledger row {id} has {what}"));
        let claim_id = value_to_key(&row.claim_id).ok_or_else(|| invalid("no claim id"))?;
        let model_name = row.model_name.ok_or_else(|| invalid("no model name"))?;
        let score = row.score.ok_or_else(|| invalid("no score"))?;
        let detected_at = row
            .detected_at
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, DETECTED_AT_FORMAT).ok())
            .ok_or_else(|| invalid("an unreadable detection time"))?;
        Ok(Self {
            claim_id,
            model_name,
            score,
            detected_at,
        })
    }
}

impl ClaimStore {
    /// Append one ledger row
    pub fn record_fraud(&self, record: &FraudRecord) -> Result<()> {
        self.append_fraud_records(std::slice::from_ref(record))?;
        Ok(())
    }

    /// Append ledger rows in one transaction
    pub fn append_fraud_records(&self, records: &[FraudRecord]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let appended = insert_fraud_records(&tx, records)?;
        tx.commit()?;
        Ok(appended)
    }

    /// Ledger rows in insertion order, optionally for one model only
    ///
    /// # Errors
    /// `InvalidData` when a row lacks its claim id, model name or score, or
    /// its detection time does not parse.
    pub fn fraud_records(&self, model_name: Option<&str>) -> Result<Vec<FraudRecord>> {
        if !self.table_exists(FRAUD_TABLE)? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT id, CLM_ID, model_name, score, detected_at FROM fraud
             WHERE ?1 IS NULL OR model_name = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![model_name], |row| {
                Ok(StoredFraudRow {
                    id: row.get(0)?,
                    claim_id: row.get(1)?,
                    model_name: row.get(2)?,
                    score: row.get(3)?,
                    detected_at: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(FraudRecord::try_from).collect()
    }

    /// Number of ledger rows, optionally for one model only
    pub fn fraud_count(&self, model_name: Option<&str>) -> Result<usize> {
        if !self.table_exists(FRAUD_TABLE)? {
            return Ok(0);
        }
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM fraud WHERE ?1 IS NULL OR model_name = ?1",
            params![model_name],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
