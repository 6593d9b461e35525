//! Error types for the PHY crate.

use crate::mcs::McsIndex;
use thiserror::Error;

/// Errors that can occur during PHY calculations and table handling.
#[derive(Debug, Error)]
pub enum PhyError {
    /// No MCS satisfies the BER requirement at the given Eb/N0.
    #[error("BER {max_ber:e} unattainable at {eb_n0} dB")]
    ConstraintUnsatisfiable {
        /// Requested Eb/N0 (dB).
        eb_n0: f64,
        /// Highest allowed bit error rate.
        max_ber: f64,
    },

    /// The BER table has no row for the requested Eb/N0.
    #[error("No BER results for Eb/N0 {0} dB")]
    UnknownEbN0(f64),

    /// The MCS table has no entry for the requested index.
    #[error("Unknown MCS {0}")]
    UnknownMcs(McsIndex),

    /// An aggregate frame grew past its size limit.
    #[error("{frame} exceeded max size: {size} bytes (max {max})")]
    SizeExceeded {
        /// Name of the aggregate (e.g. "A-MSDU").
        frame: &'static str,
        /// Computed size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Modulation rate not in {1, 2, 4, 6}.
    #[error("Invalid modulation rate: {0}")]
    InvalidModulationRate(u8),

    /// Table content is inconsistent.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error reading a table file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
