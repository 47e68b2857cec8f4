//! Command-line entry point for the claims TMEAN pipeline
//!
//! Usage:
//!   claims-tmean baselines [--domain <domain>]
//!   claims-tmean score [--domain <domain>]
//!   claims-tmean run [--domain <domain>]
//!   claims-tmean ledger [--model <name>]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use claims_tmean::{
    ClaimStore, DuplicatePolicy, MeasurementDomain, PipelineConfig, build_baselines, run,
    score_domain_with_artifacts,
};

#[derive(Parser)]
#[command(name = "claims-tmean")]
#[command(author, version, about = "Diagnosis-baseline anomaly scoring for inpatient claims", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file; flags below override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite store holding cms_claims
    #[arg(long, global = true, env = "CLAIMS_TMEAN_DB")]
    db: Option<PathBuf>,

    /// Directory with the model artifacts
    #[arg(long, global = true, env = "CLAIMS_TMEAN_MODELS")]
    models_dir: Option<PathBuf>,

    /// Raw outlier score below which a claim is flagged
    #[arg(long, global = true, env = "CLAIMS_TMEAN_THRESHOLD", allow_hyphen_values = true)]
    threshold: Option<f64>,

    /// Fail on repeated claim identifiers instead of keeping the first row
    #[arg(long, global = true)]
    reject_duplicates: bool,

    /// Show progress bars
    #[arg(long, global = true)]
    progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build measurement and baseline tables
    Baselines {
        /// Domain to build
        #[arg(short, long, value_enum, default_value = "all")]
        domain: DomainArg,
    },

    /// Score claims against existing baselines
    Score {
        /// Domain to score
        #[arg(short, long, value_enum, default_value = "all")]
        domain: DomainArg,
    },

    /// Build baselines, then score
    Run {
        /// Domain to run
        #[arg(short, long, value_enum, default_value = "all")]
        domain: DomainArg,
    },

    /// Print the fraud ledger as JSON
    Ledger {
        /// Only records written by this model
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DomainArg {
    LengthOfStay,
    TotalCharge,
    All,
}

impl DomainArg {
    fn domains(self) -> &'static [MeasurementDomain] {
        match self {
            Self::LengthOfStay => &[MeasurementDomain::LengthOfStay],
            Self::TotalCharge => &[MeasurementDomain::TotalCharge],
            Self::All => &MeasurementDomain::ALL,
        }
    }
}

impl Cli {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => PipelineConfig::new(),
        };
        if let Some(db) = &self.db {
            config = config.with_db_path(db.clone());
        }
        if let Some(models_dir) = &self.models_dir {
            config = config.with_models_dir(models_dir.clone());
        }
        if let Some(threshold) = self.threshold {
            config = config.with_fraud_threshold(threshold);
        }
        if self.reject_duplicates {
            config = config.with_duplicate_policy(DuplicatePolicy::Reject);
        }
        if self.progress {
            config = config.with_progress(true);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;
    let store = ClaimStore::open(&config.db_path)
        .with_context(|| format!("opening store {}", config.db_path.display()))?;

    let start = Instant::now();
    match &cli.command {
        Commands::Baselines { domain } => {
            for &domain in domain.domains() {
                match build_baselines(&store, domain, &config)? {
                    Some(summary) => print!("{}", summary.generate_summary()),
                    None => println!("Baselines ({domain}): skipped"),
                }
            }
        }
        Commands::Score { domain } => {
            for &domain in domain.domains() {
                let summary = score_domain_with_artifacts(&store, domain, &config)
                    .with_context(|| format!("scoring {domain}"))?;
                print!("{}", summary.generate_summary());
            }
        }
        Commands::Run { domain } => {
            for outcome in run(&store, domain.domains(), &config)? {
                if let Some(baselines) = &outcome.baselines {
                    print!("{}", baselines.generate_summary());
                }
                print!("{}", outcome.scoring.generate_summary());
            }
        }
        Commands::Ledger { model } => {
            let records = store.fraud_records(model.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    info!("Finished in {:?}", start.elapsed());

    Ok(())
}
