//! Reading source claims and writing per-claim measurement tables

use rusqlite::params;
use rusqlite::types::Value;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::models::claim::{
    CLAIM_ID_COLUMN, PRINCIPAL_CODE_COLUMN, SECONDARY_SLOTS, clean_code, secondary_code_columns,
};
use crate::models::domain::MeasurementDomain;
use crate::store::{CLAIMS_TABLE, ClaimStore, quote_ident, value_to_f64, value_to_key};
use crate::utils::log_warning;

/// A `cms_claims` row with the raw inputs of one domain's measurement
#[derive(Debug, Clone)]
pub struct SourceClaimRow {
    /// Claim identifier
    pub claim_id: String,
    /// Principal diagnosis code
    pub principal_code: Option<String>,
    /// Secondary diagnosis codes by slot
    pub secondary_codes: [Option<String>; SECONDARY_SLOTS],
    /// Raw values of the domain's measurement input columns
    pub measurement_inputs: Vec<Value>,
}

/// Columns a domain reads to derive its measurement
#[must_use]
pub const fn measurement_input_columns(domain: MeasurementDomain) -> &'static [&'static str] {
    match domain {
        MeasurementDomain::LengthOfStay => &["CLM_FROM_DT", "CLM_THRU_DT"],
        MeasurementDomain::TotalCharge => &["CLM_TOT_CHRG_AMT"],
    }
}

impl ClaimStore {
    /// Required source columns the claims table lacks for `domain`
    ///
    /// A missing claims table lacks every column.
    pub fn missing_source_columns(&self, domain: MeasurementDomain) -> Result<Vec<String>> {
        let present: FxHashSet<String> = self.table_columns(CLAIMS_TABLE)?.into_iter().collect();
        Ok(domain
            .required_source_columns()
            .into_iter()
            .filter(|column| !present.contains(column))
            .collect())
    }

    /// Load every source claim row in store order
    ///
    /// The caller checks `missing_source_columns` first. Rows without a
    /// claim identifier are skipped.
    pub fn load_source_claims(&self, domain: MeasurementDomain) -> Result<Vec<SourceClaimRow>> {
        let mut select = vec![
            quote_ident(CLAIM_ID_COLUMN),
            quote_ident(PRINCIPAL_CODE_COLUMN),
        ];
        select.extend(secondary_code_columns().iter().map(|c| quote_ident(c)));
        let inputs = measurement_input_columns(domain);
        select.extend(inputs.iter().map(|c| quote_ident(c)));

        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            select.join(", "),
            quote_ident(CLAIMS_TABLE)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let first_input = 2 + SECONDARY_SLOTS;

        let rows = stmt
            .query_map([], |row| {
                let claim_id = value_to_key(&row.get::<_, Value>(0)?);
                let principal = value_to_key(&row.get::<_, Value>(1)?);
                let mut secondary_codes: [Option<String>; SECONDARY_SLOTS] =
                    std::array::from_fn(|_| None);
                for (slot, code) in secondary_codes.iter_mut().enumerate() {
                    *code = clean_code(value_to_key(&row.get::<_, Value>(2 + slot)?).as_deref());
                }
                let measurement_inputs = (0..inputs.len())
                    .map(|i| row.get::<_, Value>(first_input + i))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(claim_id.map(|claim_id| SourceClaimRow {
                    claim_id,
                    principal_code: clean_code(principal.as_deref()),
                    secondary_codes,
                    measurement_inputs,
                }))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let total = rows.len();
        let rows: Vec<SourceClaimRow> = rows.into_iter().flatten().collect();
        if rows.len() < total {
            log_warning(
                &format!("Skipped {} rows without a claim identifier", total - rows.len()),
                Some(CLAIMS_TABLE),
            );
        }
        Ok(rows)
    }

    /// Replace the domain's measurement table with `(claim id, measurement)` pairs
    pub fn write_measurements(
        &self,
        domain: MeasurementDomain,
        measurements: &[(String, Option<f64>)],
    ) -> Result<()> {
        let table = quote_ident(domain.measurement_table());
        let column = quote_ident(domain.measurement_column());
        let sql_type = match domain {
            MeasurementDomain::LengthOfStay => "INTEGER",
            MeasurementDomain::TotalCharge => "REAL",
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} (\"CLM_ID\" TEXT, {column} {sql_type});"
        ))?;
        {
            let mut stmt =
                tx.prepare(&format!("INSERT INTO {table} (\"CLM_ID\", {column}) VALUES (?1, ?2)"))?;
            for (claim_id, measurement) in measurements {
                let value = match (domain, measurement) {
                    (_, None) => Value::Null,
                    (MeasurementDomain::LengthOfStay, Some(days)) => Value::Integer(*days as i64),
                    (MeasurementDomain::TotalCharge, Some(amount)) => Value::Real(*amount),
                };
                stmt.execute(params![claim_id, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the domain's measurement table keyed by claim id
    ///
    /// Returns `None` when the table has not been built.
    pub fn load_measurements(
        &self,
        domain: MeasurementDomain,
    ) -> Result<Option<FxHashMap<String, Option<f64>>>> {
        if !self.table_exists(domain.measurement_table())? {
            return Ok(None);
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT \"CLM_ID\", {} FROM {} ORDER BY rowid",
            quote_ident(domain.measurement_column()),
            quote_ident(domain.measurement_table())
        ))?;
        let mut measurements = FxHashMap::default();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?))
        })?;
        for row in rows {
            let (id, value) = row?;
            if let Some(id) = value_to_key(&id) {
                measurements.entry(id).or_insert_with(|| value_to_f64(&value));
            }
        }
        Ok(Some(measurements))
    }
}
