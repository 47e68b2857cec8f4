//! Shared fixtures: seeded in-memory stores and stub estimators

use std::path::Path;

use chrono::{Duration, NaiveDate};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use claims_tmean::estimator::{FeatureMatrix, OutlierScorer, Regressor};
use claims_tmean::models::claim::{SECONDARY_SLOTS, secondary_code_column};
use claims_tmean::{ClaimStore, MeasurementDomain, Result};

/// First day of every synthetic stay
pub const STAY_START: &str = "2015-01-01";

/// One `cms_claims` row
#[derive(Debug, Clone, Default)]
pub struct ClaimRow {
    pub id: String,
    pub principal: Option<String>,
    /// `(1-based slot, code)` pairs
    pub secondary: Vec<(usize, String)>,
    pub from: Option<String>,
    pub thru: Option<String>,
    pub charge: Option<f64>,
}

impl ClaimRow {
    #[must_use]
    pub fn new(id: &str, principal: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            principal: principal.map(str::to_string),
            ..Default::default()
        }
    }

    /// Put `code` in secondary slot `slot` (1-based, as in `ICD_DGNS_CD<slot>`)
    #[must_use]
    pub fn secondary(mut self, slot: usize, code: &str) -> Self {
        self.secondary.push((slot, code.to_string()));
        self
    }

    /// A stay lasting `days` days from [`STAY_START`]
    #[must_use]
    pub fn days(mut self, days: i64) -> Self {
        let from = NaiveDate::parse_from_str(STAY_START, "%Y-%m-%d").unwrap();
        self.from = Some(STAY_START.to_string());
        self.thru = Some((from + Duration::days(days)).format("%Y-%m-%d").to_string());
        self
    }

    #[must_use]
    pub fn charge(mut self, amount: f64) -> Self {
        self.charge = Some(amount);
        self
    }

    fn values(&self) -> Vec<Value> {
        let text = |v: &Option<String>| v.clone().map_or(Value::Null, Value::Text);
        let mut values = vec![Value::Text(self.id.clone()), text(&self.principal)];
        for slot in 1..=SECONDARY_SLOTS {
            let code = self
                .secondary
                .iter()
                .find(|(s, _)| *s == slot)
                .map(|(_, code)| code.clone());
            values.push(text(&code));
        }
        values.push(text(&self.from));
        values.push(text(&self.thru));
        values.push(self.charge.map_or(Value::Null, Value::Real));
        values
    }
}

fn claims_columns() -> Vec<String> {
    let mut columns = vec!["CLM_ID".to_string(), "PRNCPAL_DGNS_CD".to_string()];
    columns.extend((0..SECONDARY_SLOTS).map(secondary_code_column));
    columns.extend(["CLM_FROM_DT", "CLM_THRU_DT", "CLM_TOT_CHRG_AMT"].map(String::from));
    columns
}

/// Create `cms_claims` with the full ingestion layout
pub fn create_claims_table(store: &ClaimStore) {
    let columns: Vec<String> = claims_columns()
        .into_iter()
        .map(|c| {
            let sql_type = if c == "CLM_TOT_CHRG_AMT" { "REAL" } else { "TEXT" };
            format!("\"{c}\" {sql_type}")
        })
        .collect();
    store
        .connection()
        .execute_batch(&format!("CREATE TABLE cms_claims ({});", columns.join(", ")))
        .unwrap();
}

/// Append rows to `cms_claims`
pub fn insert_claims(store: &ClaimStore, rows: &[ClaimRow]) {
    let columns = claims_columns();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO cms_claims ({}) VALUES ({})",
        columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", "),
        placeholders.join(", ")
    );
    let mut stmt = store.connection().prepare(&sql).unwrap();
    for row in rows {
        stmt.execute(params_from_iter(row.values())).unwrap();
    }
}

/// In-memory store whose `cms_claims` holds `rows`
#[must_use]
pub fn seeded_store(rows: &[ClaimRow]) -> ClaimStore {
    let store = ClaimStore::in_memory().unwrap();
    create_claims_table(&store);
    insert_claims(&store, rows);
    store
}

/// Predicts the same value for every claim
pub struct ConstantRegressor(pub f64);

impl Regressor for ConstantRegressor {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(vec![self.0; features.rows()])
    }
}

/// Predicts the principal-code baseline (the last feature), `fallback` when missing
pub struct PrincipalBaselineRegressor {
    pub fallback: f64,
}

impl Regressor for PrincipalBaselineRegressor {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(features
            .iter_rows()
            .map(|row| match row.last() {
                Some(v) if !v.is_nan() => *v,
                _ => self.fallback,
            })
            .collect())
    }
}

/// Gives residuals below `cutoff` the `outlier` score and the rest `inlier`
pub struct ResidualCutoffScorer {
    pub cutoff: f64,
    pub outlier: f64,
    pub inlier: f64,
}

impl ResidualCutoffScorer {
    /// Flags residuals below `cutoff` at -0.6
    #[must_use]
    pub const fn below(cutoff: f64) -> Self {
        Self {
            cutoff,
            outlier: -0.6,
            inlier: 0.2,
        }
    }
}

impl OutlierScorer for ResidualCutoffScorer {
    fn decision_function(&self, samples: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(samples
            .iter_rows()
            .map(|row| if row[0] < self.cutoff { self.outlier } else { self.inlier })
            .collect())
    }
}

/// Same score for every row
pub struct FixedScorer(pub f64);

impl OutlierScorer for FixedScorer {
    fn decision_function(&self, samples: &FeatureMatrix) -> Result<Vec<f64>> {
        Ok(vec![self.0; samples.rows()])
    }
}

/// Linear regressor that predicts the principal-code baseline, 0 when missing
#[must_use]
pub fn principal_linear_artifact() -> String {
    let mut coefficients = vec![0.0; SECONDARY_SLOTS + 1];
    coefficients[SECONDARY_SLOTS] = 1.0;
    serde_json::json!({
        "kind": "linear",
        "coefficients": coefficients,
        "intercept": 0.0,
    })
    .to_string()
}

/// Isolation forest isolating residuals at or below `threshold` in a single-sample leaf
#[must_use]
pub fn negative_residual_forest_artifact(threshold: f64) -> String {
    serde_json::json!({
        "kind": "isolation_forest",
        "n_features": 1,
        "max_samples": 256,
        "offset": -0.5,
        "trees": [{
            "nodes": [
                {"feature": 0, "threshold": threshold, "left": 1, "right": 2},
                {"n_node_samples": 1},
                {"n_node_samples": 255}
            ]
        }]
    })
    .to_string()
}

/// Write both model artifacts of `domain` into `models_dir`
pub fn write_artifacts(models_dir: &Path, domain: MeasurementDomain, residual_threshold: f64) {
    std::fs::write(domain.regressor_path(models_dir), principal_linear_artifact()).unwrap();
    std::fs::write(
        domain.outlier_scorer_path(models_dir),
        negative_residual_forest_artifact(residual_threshold),
    )
    .unwrap();
}
