//! Per-domain orchestration
//!
//! Two steps per measurement domain: build the measurement and baseline
//! tables from `cms_claims`, then score claims against those baselines and
//! record the flagged ones. Missing inputs turn a step into a logged no-op;
//! store and model artifact failures abort the run.

use std::time::Instant;

use crate::algorithm::baseline::{build_principal_baseline, build_secondary_baseline};
use crate::algorithm::dedup::deduplicate;
use crate::algorithm::features::assemble_features;
use crate::algorithm::measurement::derive_measurement;
use crate::algorithm::scorer::score_features;
use crate::algorithm::statistics::{BaselineSummary, ScoringSummary};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::estimator::{OutlierScorer, Regressor, load_outlier_scorer, load_regressor};
use crate::models::baseline::BaselineKind;
use crate::models::claim::Claim;
use crate::models::domain::{MeasurementDomain, PredictionWriteMode};
use crate::store::claims::SourceClaimRow;
use crate::store::{CLAIMS_TABLE, ClaimStore};
use crate::utils::{log_operation_complete, log_operation_start, log_warning};

/// Outcome of running both steps for one domain
#[derive(Debug, Clone)]
pub struct DomainRun {
    /// Domain that was run
    pub domain: MeasurementDomain,
    /// Baseline step summary, `None` when the step was skipped
    pub baselines: Option<BaselineSummary>,
    /// Scoring step summary
    pub scoring: ScoringSummary,
}

fn to_claim(row: SourceClaimRow, measurement: Option<f64>) -> Claim {
    Claim {
        claim_id: row.claim_id,
        principal_code: row.principal_code,
        secondary_codes: row.secondary_codes,
        measurement,
    }
}

/// Load `cms_claims` for `domain`, reduced to one row per claim id
///
/// Returns `None` (after logging) when required source columns are missing.
fn load_claim_rows(
    store: &ClaimStore,
    domain: MeasurementDomain,
    config: &PipelineConfig,
) -> Result<Option<(Vec<SourceClaimRow>, usize)>> {
    let missing = store.missing_source_columns(domain)?;
    if !missing.is_empty() {
        log_warning(
            &format!("Skipping {domain}, missing columns {}", missing.join(", ")),
            Some(CLAIMS_TABLE),
        );
        return Ok(None);
    }
    let rows = store.load_source_claims(domain)?;
    let deduplicated = deduplicate(rows, |row| row.claim_id.as_str(), config.duplicate_policy)?;
    Ok(Some((deduplicated.rows, deduplicated.dropped)))
}

/// Build the measurement table and both baselines for `domain`
///
/// Replaces the domain's measurement and baseline tables. For an
/// append-mode domain the predictions table is reset as well, so the next
/// scoring pass starts from scratch.
///
/// # Returns
/// `None` when the claims table lacks the domain's required columns.
pub fn build_baselines(
    store: &ClaimStore,
    domain: MeasurementDomain,
    config: &PipelineConfig,
) -> Result<Option<BaselineSummary>> {
    let start = Instant::now();
    log_operation_start("Building baselines for", domain.name());

    let Some((rows, duplicates_dropped)) = load_claim_rows(store, domain, config)? else {
        return Ok(None);
    };

    let claims: Vec<Claim> = rows
        .into_iter()
        .map(|row| {
            let measurement = derive_measurement(domain, &row.measurement_inputs);
            to_claim(row, measurement)
        })
        .collect();

    let measurements: Vec<(String, Option<f64>)> = claims
        .iter()
        .map(|claim| (claim.claim_id.clone(), claim.measurement))
        .collect();
    store.write_measurements(domain, &measurements)?;

    let missing_measurement_count = claims.iter().filter(|c| c.measurement.is_none()).count();
    if missing_measurement_count > 0 {
        log_warning(
            &format!("{missing_measurement_count} claims have no {}", domain.measurement_column()),
            Some(domain.measurement_table()),
        );
    }

    let principal = build_principal_baseline(&claims);
    let secondary = build_secondary_baseline(&claims);
    store.write_baseline(domain, &principal)?;
    store.write_baseline(domain, &secondary)?;

    if domain.write_mode() == PredictionWriteMode::Append {
        store.create_predictions_table(domain)?;
    }

    let summary = BaselineSummary {
        domain,
        claim_count: claims.len(),
        duplicates_dropped,
        missing_measurement_count,
        principal_code_count: principal.len(),
        secondary_code_count: secondary.len(),
    };
    log_operation_complete("built baselines from", domain.name(), claims.len(), Some(start.elapsed()));
    log::debug!("{}", summary.generate_summary());
    Ok(Some(summary))
}

/// Claims eligible for scoring, with their stored measurements attached
fn claims_to_score(
    store: &ClaimStore,
    domain: MeasurementDomain,
    config: &PipelineConfig,
) -> Result<Vec<Claim>> {
    let Some((rows, _)) = load_claim_rows(store, domain, config)? else {
        return Ok(Vec::new());
    };
    let Some(measurements) = store.load_measurements(domain)? else {
        log_warning("Measurement table not built", Some(domain.measurement_table()));
        return Ok(Vec::new());
    };

    let already_scored = match domain.write_mode() {
        PredictionWriteMode::Append => store.scored_claim_ids(domain)?,
        PredictionWriteMode::Replace => Default::default(),
    };

    let total = rows.len();
    let (fresh, scored): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|row| !already_scored.contains(&row.claim_id));
    if !scored.is_empty() {
        log::info!(
            "{} of {total} claims already scored in {}",
            scored.len(),
            domain.predictions_table()
        );
    }

    let candidates = fresh.len();
    let claims: Vec<Claim> = fresh
        .into_iter()
        .filter_map(|row| {
            let measurement = measurements.get(&row.claim_id).copied().flatten()?;
            Some(to_claim(row, Some(measurement)))
        })
        .collect();
    if claims.len() < candidates {
        log_warning(
            &format!("{} claims without a measurement left unscored", candidates - claims.len()),
            Some(domain.measurement_table()),
        );
    }
    Ok(claims)
}

/// Score `domain` with the given estimators
///
/// Persists the predictions table per the domain's write mode and appends
/// flagged claims to the fraud ledger, both in one transaction. Nothing is
/// written when there is nothing to score.
pub fn score_domain<R, S>(
    store: &ClaimStore,
    domain: MeasurementDomain,
    regressor: &R,
    outlier_scorer: &S,
    config: &PipelineConfig,
) -> Result<ScoringSummary>
where
    R: Regressor + ?Sized,
    S: OutlierScorer + ?Sized,
{
    let start = Instant::now();
    log_operation_start("Scoring", domain.name());
    let empty = ScoringSummary::empty(domain, config.fraud_threshold);

    let (Some(principal), Some(secondary)) = (
        store.load_baseline(domain, BaselineKind::Principal)?,
        store.load_baseline(domain, BaselineKind::Secondary)?,
    ) else {
        log_warning("Baselines not built, nothing to score", Some(domain.name()));
        return Ok(empty);
    };

    let claims = claims_to_score(store, domain, config)?;
    if claims.is_empty() {
        log_warning("No claims to score", Some(domain.name()));
        return Ok(empty);
    }

    let features = assemble_features(domain, &claims, &principal, &secondary, config.show_progress)?;
    let outcome = score_features(
        domain,
        &features,
        regressor,
        outlier_scorer,
        config.fraud_threshold,
    )?;

    let (written, flagged) =
        store.persist_scoring_pass(domain, &outcome.predictions, &outcome.fraud_records)?;
    log_operation_complete("wrote", domain.predictions_table(), written, None);
    if flagged > 0 {
        log::warn!("Flagged {flagged} {domain} claims as potential fraud");
    }

    log_operation_complete("scored", domain.name(), written, Some(start.elapsed()));
    log::debug!("{}", outcome.summary.generate_summary());
    Ok(outcome.summary)
}

/// Score `domain` with the estimators stored under `config.models_dir`
///
/// Artifacts are loaded before the store is touched; a missing or corrupt
/// artifact fails the step.
pub fn score_domain_with_artifacts(
    store: &ClaimStore,
    domain: MeasurementDomain,
    config: &PipelineConfig,
) -> Result<ScoringSummary> {
    let regressor = load_regressor(&domain.regressor_path(&config.models_dir))?;
    let outlier_scorer = load_outlier_scorer(&domain.outlier_scorer_path(&config.models_dir))?;
    score_domain(store, domain, &regressor, &outlier_scorer, config)
}

/// Build baselines then score, for each domain in turn
pub fn run(
    store: &ClaimStore,
    domains: &[MeasurementDomain],
    config: &PipelineConfig,
) -> Result<Vec<DomainRun>> {
    domains
        .iter()
        .map(|&domain| {
            let baselines = build_baselines(store, domain, config)?;
            let scoring = score_domain_with_artifacts(store, domain, config)?;
            Ok(DomainRun {
                domain,
                baselines,
                scoring,
            })
        })
        .collect()
}
