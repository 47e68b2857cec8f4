//! Diagnosis-code baseline builder
//!
//! Computes the mean measurement ("TMEAN") per diagnosis code, once over
//! principal codes and once over codes seen in any secondary slot.

use rustc_hash::FxHashMap;

use crate::models::baseline::{BaselineKind, DiagnosisBaseline};
use crate::models::claim::Claim;

/// Running sum and count for one code
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

fn finish(kind: BaselineKind, accumulators: FxHashMap<String, MeanAccumulator>) -> DiagnosisBaseline {
    let means = accumulators
        .into_iter()
        .map(|(code, acc)| (code, acc.mean()))
        .collect();
    DiagnosisBaseline::from_means(kind, means)
}

/// Mean measurement per principal diagnosis code
///
/// Claims without a principal code or without a measurement do not
/// contribute.
#[must_use]
pub fn build_principal_baseline(claims: &[Claim]) -> DiagnosisBaseline {
    let mut accumulators: FxHashMap<String, MeanAccumulator> = FxHashMap::default();

    for claim in claims {
        let (Some(code), Some(value)) = (claim.principal_code.as_deref(), claim.measurement) else {
            continue;
        };
        accumulators.entry(code.to_string()).or_default().push(value);
    }

    finish(BaselineKind::Principal, accumulators)
}

/// Mean measurement per code appearing in any secondary slot
///
/// Single pass over the claims: each claim contributes its measurement once
/// for every distinct code among its secondary slots, so a code repeated in
/// two slots of the same claim is counted once for that claim.
#[must_use]
pub fn build_secondary_baseline(claims: &[Claim]) -> DiagnosisBaseline {
    let mut accumulators: FxHashMap<String, MeanAccumulator> = FxHashMap::default();

    for claim in claims {
        let Some(value) = claim.measurement else {
            continue;
        };
        for code in claim.distinct_secondary_codes() {
            if let Some(acc) = accumulators.get_mut(code) {
                acc.push(value);
            } else {
                let mut acc = MeanAccumulator::default();
                acc.push(value);
                accumulators.insert(code.to_string(), acc);
            }
        }
    }

    finish(BaselineKind::Secondary, accumulators)
}
