//! Arrow schemas of the feature and prediction tables

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::models::claim::{
    CLAIM_ID_COLUMN, PRINCIPAL_CODE_COLUMN, PRINCIPAL_TMEAN_COLUMN, SECONDARY_SLOTS,
    secondary_code_column, secondary_tmean_column,
};
use crate::models::domain::MeasurementDomain;

/// Number of model features: one per secondary slot plus the principal code
pub const FEATURE_COUNT: usize = SECONDARY_SLOTS + 1;

/// Feature columns in the order the estimators expect them
///
/// Secondary slot baselines come first, the principal baseline last.
#[must_use]
pub fn model_feature_columns() -> Vec<String> {
    (0..SECONDARY_SLOTS)
        .map(secondary_tmean_column)
        .chain(std::iter::once(PRINCIPAL_TMEAN_COLUMN.to_string()))
        .collect()
}

fn feature_fields(domain: MeasurementDomain) -> Vec<Field> {
    let mut fields = vec![
        Field::new(CLAIM_ID_COLUMN, DataType::Utf8, false),
        Field::new(PRINCIPAL_CODE_COLUMN, DataType::Utf8, true),
        Field::new(domain.measurement_column(), DataType::Float64, true),
    ];
    fields.extend((0..SECONDARY_SLOTS).map(|slot| Field::new(secondary_code_column(slot), DataType::Utf8, true)));
    fields.push(Field::new(PRINCIPAL_TMEAN_COLUMN, DataType::Float64, true));
    fields.extend(
        (0..SECONDARY_SLOTS).map(|slot| Field::new(secondary_tmean_column(slot), DataType::Float64, true)),
    );
    fields
}

/// Schema of the assembled feature table
#[must_use]
pub fn feature_schema(domain: MeasurementDomain) -> SchemaRef {
    Arc::new(Schema::new(feature_fields(domain)))
}

/// Schema of the predictions table: features plus prediction and outlier score
#[must_use]
pub fn prediction_schema(domain: MeasurementDomain) -> SchemaRef {
    let mut fields = feature_fields(domain);
    fields.push(Field::new(domain.prediction_column(), DataType::Float64, true));
    fields.push(Field::new(domain.score_column(), DataType::Float64, true));
    Arc::new(Schema::new(fields))
}
