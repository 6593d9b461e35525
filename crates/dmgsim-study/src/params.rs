//! Study parameters.

use crate::duration::BeamformingConfig;
use crate::error::StudyError;
use crate::mobility::Mobility;
use dmgsim_phy::constants::MAX_MSDU_LENGTH;
use dmgsim_timeslot::Nanos;
use serde::{Deserialize, Serialize};

/// Default beacon interval duration (100 ms).
pub const DEFAULT_BI_DURATION_NS: Nanos = 100_000_000;
/// Default number of observed beacon intervals.
pub const DEFAULT_OBSERVED_BI: usize = 10;

fn default_responder_antennas() -> u64 {
    1
}

fn default_bi_duration() -> Nanos {
    DEFAULT_BI_DURATION_NS
}

fn default_observed_bi() -> usize {
    DEFAULT_OBSERVED_BI
}

fn default_num_users() -> usize {
    1
}

/// One parameter combination of a study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyParams {
    /// Channel quality in dB.
    pub eb_n0: f64,
    /// Highest allowed bit error rate.
    pub max_ber: f64,

    /// Antennas of the user equipment (BFT initiator).
    pub initiator_antennas: u64,
    /// Sectors per initiator antenna.
    pub initiator_sectors: u64,
    /// Antennas of the AP (BFT responder).
    #[serde(default = "default_responder_antennas")]
    pub responder_antennas: u64,
    /// Sectors per responder antenna; defaults to the initiator's.
    #[serde(default)]
    pub responder_sectors: Option<u64>,
    /// Include the sector level sweep in every BFT.
    pub enable_sls: bool,
    /// Let the responder sweep its sectors during SLS.
    pub enable_responder_txss: bool,
    /// User mobility, sets the BFT period.
    #[serde(default)]
    pub mobility: Mobility,

    /// MSDU length in octets.
    pub msdu_length_bytes: u64,
    /// Aggregate as many MSDUs as fit into one A-MSDU.
    #[serde(default)]
    pub msdu_aggregation: bool,
    /// Aggregate as many MPDUs as fit into one A-MPDU.
    #[serde(default)]
    pub mpdu_aggregation: bool,
    /// Precede every data PPDU by a CTS-to-self.
    #[serde(default)]
    pub self_cts: bool,
    /// Acknowledge every data PPDU.
    #[serde(default)]
    pub ack: bool,
    #[serde(default = "default_num_users")]
    pub num_users: usize,

    #[serde(default = "default_bi_duration")]
    pub bi_duration_ns: Nanos,
    #[serde(default = "default_observed_bi")]
    pub observed_bi: usize,
    /// Seed of the random BFT placement.
    #[serde(default)]
    pub seed: u64,
}

impl StudyParams {
    /// Check ranges that the schedule computations rely on.
    pub fn validate(&self) -> Result<(), StudyError> {
        let fail = |msg: String| -> Result<(), StudyError> {
            Err(StudyError::InvalidParams(msg))
        };

        if !self.eb_n0.is_finite() {
            return fail(format!("eb_n0 must be finite, got {}", self.eb_n0));
        }
        if !(self.max_ber > 0.0 && self.max_ber < 1.0) {
            return fail(format!("max_ber must be in (0, 1), got {}", self.max_ber));
        }
        if self.initiator_antennas == 0 || self.responder_antennas == 0 {
            return fail("antenna counts must be positive".to_string());
        }
        if self.initiator_sectors == 0 || self.responder_sectors == Some(0) {
            return fail("sector counts must be positive".to_string());
        }
        if self.msdu_length_bytes == 0 || self.msdu_length_bytes > MAX_MSDU_LENGTH {
            return fail(format!(
                "msdu_length_bytes must be in 1..={}, got {}",
                MAX_MSDU_LENGTH, self.msdu_length_bytes
            ));
        }
        if self.num_users == 0 {
            return fail("num_users must be positive".to_string());
        }
        if self.bi_duration_ns == 0 || self.observed_bi == 0 {
            return fail("bi_duration_ns and observed_bi must be positive".to_string());
        }
        Ok(())
    }

    /// Responder sector count after applying the default.
    pub fn responder_sectors(&self) -> u64 {
        self.responder_sectors.unwrap_or(self.initiator_sectors)
    }

    /// Antenna setup of the BFT.
    pub fn beamforming(&self) -> BeamformingConfig {
        BeamformingConfig {
            initiator_antennas: self.initiator_antennas,
            initiator_sectors: self.initiator_sectors,
            responder_antennas: self.responder_antennas,
            responder_sectors: self.responder_sectors(),
            enable_sls: self.enable_sls,
            enable_responder_txss: self.enable_responder_txss,
        }
    }

    /// Observed time in ns.
    pub fn horizon(&self) -> Nanos {
        self.observed_bi as Nanos * self.bi_duration_ns
    }
}
