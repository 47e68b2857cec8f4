//! Feature assembly
//!
//! Left-joins each claim onto the principal baseline by principal code and,
//! independently for each of the 25 secondary slots, onto the secondary
//! baseline by that slot's code. The result is one Arrow row per claim
//! carrying the codes, the observed measurement and 26 baseline columns.
//! Absent or unmatched codes leave the baseline column null; no claim is
//! ever dropped.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::models::baseline::DiagnosisBaseline;
use crate::models::claim::{Claim, SECONDARY_SLOTS};
use crate::models::domain::MeasurementDomain;
use crate::models::schema::feature_schema;
use crate::utils::logging::{create_step_progress_bar, finish_and_clear};

/// Resolve one baseline column for every claim
fn join_baseline<'a, F>(claims: &'a [Claim], baseline: &DiagnosisBaseline, code_of: F) -> ArrayRef
where
    F: Fn(&'a Claim) -> Option<&'a str>,
{
    let values: Float64Array = claims.iter().map(|claim| baseline.resolve(code_of(claim))).collect();
    Arc::new(values)
}

/// Assemble the feature table for `claims`
///
/// Column layout follows [`feature_schema`].
pub fn assemble_features(
    domain: MeasurementDomain,
    claims: &[Claim],
    principal: &DiagnosisBaseline,
    secondary: &DiagnosisBaseline,
    show_progress: bool,
) -> Result<RecordBatch> {
    let pb = create_step_progress_bar(
        (SECONDARY_SLOTS + 1) as u64,
        &format!("Joining {domain} baselines"),
        show_progress,
    );

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(3 + SECONDARY_SLOTS * 2 + 1);
    columns.push(Arc::new(StringArray::from_iter_values(
        claims.iter().map(|c| c.claim_id.as_str()),
    )));
    columns.push(Arc::new(
        claims.iter().map(|c| c.principal_code.as_deref()).collect::<StringArray>(),
    ));
    columns.push(Arc::new(
        claims.iter().map(|c| c.measurement).collect::<Float64Array>(),
    ));
    for slot in 0..SECONDARY_SLOTS {
        columns.push(Arc::new(
            claims
                .iter()
                .map(|c| c.secondary_codes[slot].as_deref())
                .collect::<StringArray>(),
        ));
    }

    columns.push(join_baseline(claims, principal, |c| c.principal_code.as_deref()));
    pb.inc(1);

    for slot in 0..SECONDARY_SLOTS {
        columns.push(join_baseline(claims, secondary, move |c| {
            c.secondary_codes[slot].as_deref()
        }));
        pb.inc(1);
    }
    finish_and_clear(&pb);

    let batch = RecordBatch::try_new(feature_schema(domain), columns)?;
    log::debug!(
        "Assembled {} feature rows with {} columns for {domain}",
        batch.num_rows(),
        batch.num_columns()
    );
    Ok(batch)
}
