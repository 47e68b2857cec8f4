//! Measurement derivation
//!
//! Turns the raw `cms_claims` inputs of a domain into one number per claim:
//! elapsed days between the claim dates, or the total charge amount.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;

use crate::models::domain::MeasurementDomain;
use crate::store::value_to_f64;

/// Date-time formats tried in order
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Date formats tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // ISO format: 2023-01-15
    "%Y%m%d",   // Compact: 20230115
    "%m/%d/%Y", // US: 01/15/2023
    "%Y/%m/%d", // 2023/01/15
];

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Interpret a stored claim date
///
/// Text is parsed with [`parse_date_string`]; integers are read as
/// `YYYYMMDD`.
#[must_use]
pub fn parse_claim_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Text(s) => parse_date_string(s),
        Value::Integer(i) => parse_date_string(&i.to_string()),
        Value::Real(f) if f.fract() == 0.0 => parse_date_string(&format!("{f:.0}")),
        _ => None,
    }
}

/// Whole days from `from` to `through`, floored
#[must_use]
pub fn days_between(from: NaiveDateTime, through: NaiveDateTime) -> i64 {
    (through - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Derive a domain's measurement from its raw input values
///
/// `inputs` holds the values of the domain's measurement input columns in
/// order. Missing or unparseable inputs give `None`.
#[must_use]
pub fn derive_measurement(domain: MeasurementDomain, inputs: &[Value]) -> Option<f64> {
    match domain {
        MeasurementDomain::LengthOfStay => {
            let from = parse_claim_date(inputs.first()?)?;
            let through = parse_claim_date(inputs.get(1)?)?;
            Some(days_between(from, through) as f64)
        }
        MeasurementDomain::TotalCharge => value_to_f64(inputs.first()?).filter(|v| v.is_finite()),
    }
}
