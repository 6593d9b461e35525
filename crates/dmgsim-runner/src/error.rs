//! Error types for the runner.

use dmgsim_phy::PhyError;
use dmgsim_study::StudyError;
use thiserror::Error;

/// Errors raised while loading inputs or writing results.
///
/// Failures of the study itself are reported inside a
/// [`RunRecord`](crate::RunRecord) instead.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid study configuration: {0}")]
    Study(#[from] StudyError),

    #[error("Table error: {0}")]
    Phy(#[from] PhyError),
}
