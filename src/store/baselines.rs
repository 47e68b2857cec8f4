//! Baseline tables

use rusqlite::params;
use rusqlite::types::Value;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::models::baseline::{BaselineKind, DiagnosisBaseline};
use crate::models::domain::MeasurementDomain;
use crate::store::{ClaimStore, quote_ident, value_to_f64, value_to_key};

const fn baseline_table(domain: MeasurementDomain, kind: BaselineKind) -> &'static str {
    match kind {
        BaselineKind::Principal => domain.principal_baseline_table(),
        BaselineKind::Secondary => domain.secondary_baseline_table(),
    }
}

impl ClaimStore {
    /// Replace a baseline table with the contents of `baseline`
    pub fn write_baseline(&self, domain: MeasurementDomain, baseline: &DiagnosisBaseline) -> Result<()> {
        let kind = baseline.kind();
        let table = quote_ident(baseline_table(domain, kind));
        let code = quote_ident(kind.code_column());
        let mean = quote_ident(kind.mean_column());

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({code} TEXT, {mean} REAL);"
        ))?;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {table} ({code}, {mean}) VALUES (?1, ?2)"))?;
            for (code, value) in baseline.sorted_entries() {
                stmt.execute(params![code, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load a baseline table
    ///
    /// Returns `None` when the table has not been built. Rows with a null
    /// key or mean are ignored.
    pub fn load_baseline(
        &self,
        domain: MeasurementDomain,
        kind: BaselineKind,
    ) -> Result<Option<DiagnosisBaseline>> {
        let table = baseline_table(domain, kind);
        if !self.table_exists(table)? {
            return Ok(None);
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}, {} FROM {}",
            quote_ident(kind.code_column()),
            quote_ident(kind.mean_column()),
            quote_ident(table)
        ))?;
        let mut means = FxHashMap::default();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?))
        })?;
        for row in rows {
            let (code, mean) = row?;
            if let (Some(code), Some(mean)) = (value_to_key(&code), value_to_f64(&mean)) {
                means.insert(code, mean);
            }
        }
        Ok(Some(DiagnosisBaseline::from_means(kind, means)))
    }
}
