//! # dmgsim-runner
//!
//! Loads study configurations and lookup tables, runs studies and produces
//! JSON-serializable [`RunRecord`]s. The `dmgsim` binary is a thin CLI over
//! this library.
//!
//! ## Example
//!
//! ```no_run
//! use dmgsim_runner::{load_params, run, Tables};
//! use dmgsim_study::Strategy;
//! use std::path::Path;
//!
//! let params = load_params(Path::new("study.yaml"))?;
//! let tables = Tables::load(Path::new("ber.yaml"), None)?;
//! let record = run(params, &tables, Strategy::Fast, false);
//! println!("{}", serde_json::to_string_pretty(&record)?);
//! # Ok::<(), dmgsim_runner::RunnerError>(())
//! ```

mod error;
mod record;

pub use error::RunnerError;
pub use record::{Comparison, RunRecord, RunStatus};

use chrono::Utc;
use dmgsim_phy::{BerTable, McsTable};
use dmgsim_study::{run_study, Strategy, StudyParams};
use std::path::Path;
use tracing::{debug, info, warn};

/// Parse and validate study parameters from YAML.
pub fn params_from_yaml_str(yaml: &str) -> Result<StudyParams, RunnerError> {
    let params: StudyParams = serde_yaml::from_str(yaml)?;
    params.validate()?;
    Ok(params)
}

/// Load study parameters from a YAML file.
pub fn load_params(path: &Path) -> Result<StudyParams, RunnerError> {
    let yaml = std::fs::read_to_string(path)?;
    let params = params_from_yaml_str(&yaml)?;
    debug!(path = %path.display(), "Loaded study configuration");
    Ok(params)
}

/// Lookup tables shared by all runs of a process.
#[derive(Debug, Clone)]
pub struct Tables {
    pub mcs: McsTable,
    pub ber: BerTable,
}

impl Tables {
    /// Load the BER table and, if given, an MCS table replacing the built-in one.
    pub fn load(ber_path: &Path, mcs_path: Option<&Path>) -> Result<Self, RunnerError> {
        let ber = BerTable::from_path(ber_path)?;
        let mcs = match mcs_path {
            Some(path) => McsTable::from_path(path)?,
            None => McsTable::default(),
        };
        debug!(
            ber_rows = ber.len(),
            mcs_entries = mcs.len(),
            "Loaded lookup tables"
        );
        Ok(Self { mcs, ber })
    }
}

/// Run one study. Study failures are captured in the record.
pub fn run(params: StudyParams, tables: &Tables, strategy: Strategy, raw_times: bool) -> RunRecord {
    let started_at = Utc::now();
    let outcome = run_study(params.clone(), &tables.mcs, &tables.ber, strategy);
    let record = RunRecord::from_outcome(params, strategy, started_at, outcome, raw_times);

    match &record.error {
        Some(error) => warn!(%strategy, status = record.status.code(), %error, "Run failed"),
        None => info!(%strategy, msdus = record.num_msdus, "Run recorded"),
    }
    record
}

/// Run both strategies on the same parameters.
pub fn compare(params: StudyParams, tables: &Tables, raw_times: bool) -> Comparison {
    let descriptive = run(params.clone(), tables, Strategy::Descriptive, raw_times);
    let fast = run(params, tables, Strategy::Fast, raw_times);
    let comparison = Comparison::new(descriptive, fast);
    if let Some(diff) = comparison.relative_difference {
        info!(relative_difference = diff, "Compared strategies");
    }
    comparison
}
