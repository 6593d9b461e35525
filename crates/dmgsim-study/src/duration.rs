//! Timeslot durations of a beacon interval.
//!
//! Every duration is generated exactly once by its `generate_*` method and
//! can only be read afterwards. All values are in nanoseconds.

use crate::error::StateError;
use dmgsim_phy::constants::*;
use dmgsim_phy::{control_frame_size, data_frame_size, symbols_to_ns, Mcs};
use dmgsim_timeslot::Nanos;
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// Frame payloads (octets)
// ============================================================================

const CTS_PAYLOAD: u64 = 20;
const ACK_PAYLOAD: u64 = 14;
const BLOCK_ACK_PAYLOAD: u64 = 32;
const SSW_PAYLOAD: u64 = 24;
const SSW_FEEDBACK_PAYLOAD: u64 = 28;
const SSW_ACK_PAYLOAD: u64 = 28;
const BRP_PAYLOAD: u64 = 42;

/// Beacon frame bytes: mandatory part, extended schedule element header, SSID.
const BEACON_FIXED_PAYLOAD: u64 = 66 + 2 + 34;
/// Extended schedule element bytes per allocation.
const BEACON_ALLOCATION_PAYLOAD: u64 = 15;

// ============================================================================
// Beamforming configuration
// ============================================================================

/// Antenna setup of one beamforming training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamformingConfig {
    pub initiator_antennas: u64,
    pub initiator_sectors: u64,
    pub responder_antennas: u64,
    pub responder_sectors: u64,
    /// Include the sector level sweep; BRP is always included.
    pub enable_sls: bool,
    /// Responder TXSS during SLS instead of a single feedback frame.
    pub enable_responder_txss: bool,
}

/// Sector level sweep duration.
fn sls_duration(cfg: &BeamformingConfig) -> Nanos {
    let ssw = control_frame_size(SSW_PAYLOAD);
    let feedback = control_frame_size(SSW_FEEDBACK_PAYLOAD);
    let ack = control_frame_size(SSW_ACK_PAYLOAD);

    let BeamformingConfig {
        initiator_antennas: i_ant,
        initiator_sectors: i_sec,
        responder_antennas: r_ant,
        responder_sectors: r_sec,
        ..
    } = *cfg;

    let initiator_slots = i_ant * i_sec * r_ant;
    // Without responder TXSS a single frame carries the feedback
    let responder_slots = if cfg.enable_responder_txss {
        r_ant * r_sec * i_ant
    } else {
        1
    };

    let ppdu_time = symbols_to_ns(ssw * (initiator_slots + responder_slots) + feedback + ack);

    // SBIFS between sweep frames of one antenna, LBIFS on antenna switches,
    // MBIFS from TXSS to RXSS
    let mut idle = SBIFS_NS * i_sec.saturating_sub(1) * i_ant * r_ant
        + LBIFS_NS * i_ant * r_ant
        + MBIFS_NS;
    if cfg.enable_responder_txss {
        idle += SBIFS_NS * r_sec.saturating_sub(1) * r_ant * i_ant + LBIFS_NS * i_ant * r_ant;
    }
    // Sweep to feedback and feedback to ack need an antenna switch when the
    // responder has more than one antenna
    let turnaround = if r_ant > 1 { LBIFS_NS } else { MBIFS_NS };
    idle += 2 * turnaround;

    ppdu_time + idle
}

/// Beam refinement duration, before rounding.
fn brp_duration(cfg: &BeamformingConfig) -> f64 {
    let brp_sectors = |sectors: u64| {
        let quota = (sectors as f64 * BRP_SECTOR_QUOTA).ceil() as u64;
        quota.max(BRP_MIN_SECTORS)
    };

    let brp_frame = control_frame_size(BRP_PAYLOAD);
    let symbols = brp_frame
        + brp_sectors(cfg.initiator_sectors) * AGC_AND_TRN_LENGTH
        + brp_frame
        + brp_sectors(cfg.responder_sectors) * AGC_AND_TRN_LENGTH;

    // One SIFS between the two RX-TRN transactions
    symbols as f64 / SYMBOL_RATE_GHZ + SIFS_NS as f64
}

/// Total beamforming training duration.
pub fn bft_duration(cfg: &BeamformingConfig) -> Nanos {
    let sls = if cfg.enable_sls {
        // SIFS separates SLS from BRP
        sls_duration(cfg) + SIFS_NS
    } else {
        0
    };
    (sls as f64 + brp_duration(cfg)).round() as Nanos
}

/// Guard time for non-pseudo-static allocations, rounded up to whole microseconds.
///
/// Clock drift accumulates over one beacon interval since stations
/// resynchronise at every BTI.
pub fn guard_time(bi_duration: Nanos) -> Nanos {
    // Drift in ns scaled by 1e6 to stay in integers
    let scaled = CLOCK_DRIFT_PPM * bi_duration + (SIFS_NS + GUARD_TIME_MARGIN_NS) * 1_000_000;
    scaled.div_ceil(1_000_000_000) * 1_000
}

// ============================================================================
// Duration set
// ============================================================================

fn store(slot: &mut Option<Nanos>, name: &'static str, value: Nanos) -> Result<Nanos, StateError> {
    if slot.is_some() {
        return Err(StateError::DurationAlreadySet(name));
    }
    debug!(duration = name, ns = value, "Generated duration");
    *slot = Some(value);
    Ok(value)
}

fn load(slot: Option<Nanos>, name: &'static str) -> Result<Nanos, StateError> {
    slot.ok_or(StateError::UnsetDuration(name))
}

/// Write-once store of the durations used by the schedule engines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationSet {
    guard_time: Option<Nanos>,
    bti: BTreeMap<u64, Nanos>,
    bft: Option<Nanos>,
    data_ppdu: Option<Nanos>,
    cts: Option<Nanos>,
    ack: Option<Nanos>,
    data_with_overhead: Option<Nanos>,
}

impl DurationSet {
    /// Empty set, every getter fails until its generator ran.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the guard time between allocations.
    pub fn generate_guard_time(&mut self, bi_duration: Nanos) -> Result<Nanos, StateError> {
        store(&mut self.guard_time, "guard time", guard_time(bi_duration))
    }

    /// Generate the BTI duration for a beacon announcing `num_allocations` allocations.
    pub fn generate_bti(&mut self, num_allocations: u64) -> Result<Nanos, StateError> {
        if self.bti.contains_key(&num_allocations) {
            return Err(StateError::DurationAlreadySet("BTI"));
        }
        let payload = BEACON_FIXED_PAYLOAD + BEACON_ALLOCATION_PAYLOAD * num_allocations;
        let duration = symbols_to_ns(control_frame_size(payload));
        debug!(num_allocations, ns = duration, "Generated BTI duration");
        self.bti.insert(num_allocations, duration);
        Ok(duration)
    }

    /// Generate the beamforming training duration.
    pub fn generate_bft(&mut self, cfg: &BeamformingConfig) -> Result<Nanos, StateError> {
        store(&mut self.bft, "BFT", bft_duration(cfg))
    }

    /// Generate the data PPDU duration for a PSDU sent with `mcs`.
    pub fn generate_data_ppdu(&mut self, psdu_length: u64, mcs: &Mcs) -> Result<Nanos, StateError> {
        let size = data_frame_size(psdu_length, mcs.modulation, mcs.code_rate);
        store(&mut self.data_ppdu, "data PPDU", symbols_to_ns(size))
    }

    /// Generate the CTS-to-self duration.
    pub fn generate_cts(&mut self) -> Result<Nanos, StateError> {
        store(
            &mut self.cts,
            "CTS",
            symbols_to_ns(control_frame_size(CTS_PAYLOAD)),
        )
    }

    /// Generate the acknowledgement duration.
    ///
    /// A single MPDU gets an immediate ACK, A-MPDUs a block ACK.
    pub fn generate_ack(&mut self, num_mpdu: u64) -> Result<Nanos, StateError> {
        let payload = if num_mpdu == 1 {
            ACK_PAYLOAD
        } else {
            BLOCK_ACK_PAYLOAD
        };
        store(&mut self.ack, "ACK", symbols_to_ns(control_frame_size(payload)))
    }

    /// Generate the duration of one data exchange.
    ///
    /// Data PPDU and trailing DIFS, plus CTS and SIFS when `enable_cts`, plus
    /// SIFS and ACK when `enable_ack`.
    pub fn generate_data_with_overhead(
        &mut self,
        enable_cts: bool,
        enable_ack: bool,
    ) -> Result<Nanos, StateError> {
        let mut duration = self.data_ppdu()? + DIFS_NS;
        if enable_cts {
            duration += self.cts()? + SIFS_NS;
        }
        if enable_ack {
            duration += self.ack()? + SIFS_NS;
        }
        store(&mut self.data_with_overhead, "data with overhead", duration)
    }

    /// Guard time between allocations (ns).
    pub fn guard_time(&self) -> Result<Nanos, StateError> {
        load(self.guard_time, "guard time")
    }

    /// BTI duration for the given allocation count.
    pub fn bti(&self, num_allocations: u64) -> Result<Nanos, StateError> {
        self.bti
            .get(&num_allocations)
            .copied()
            .ok_or(StateError::UnsetDuration("BTI"))
    }

    /// One full beamforming training (ns).
    pub fn bft(&self) -> Result<Nanos, StateError> {
        load(self.bft, "BFT")
    }

    /// Data PPDU airtime at the selected MCS (ns).
    pub fn data_ppdu(&self) -> Result<Nanos, StateError> {
        load(self.data_ppdu, "data PPDU")
    }

    /// CTS-to-self airtime (ns).
    pub fn cts(&self) -> Result<Nanos, StateError> {
        load(self.cts, "CTS")
    }

    /// Immediate or block ACK airtime (ns).
    pub fn ack(&self) -> Result<Nanos, StateError> {
        load(self.ack, "ACK")
    }

    /// One data exchange including DIFS and the enabled CTS and ACK.
    pub fn data_with_overhead(&self) -> Result<Nanos, StateError> {
        load(self.data_with_overhead, "data with overhead")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmgsim_phy::{McsIndex, McsTable};

    fn bft_config(enable_sls: bool, enable_responder_txss: bool) -> BeamformingConfig {
        BeamformingConfig {
            initiator_antennas: 1,
            initiator_sectors: 28,
            responder_antennas: 1,
            responder_sectors: 28,
            enable_sls,
            enable_responder_txss,
        }
    }

    #[test]
    fn test_guard_time() {
        // 20 ppm of 100 ms = 2 us, plus SIFS and margin = 5.1 us -> 6 us
        assert_eq!(guard_time(100_000_000), 6_000);
        // 3.1 us -> 4 us
        assert_eq!(guard_time(0), 4_000);
        // 20 ppm of 45 ms = 0.9 us -> exactly 4 us
        assert_eq!(guard_time(45_000_000), 4_000);
    }

    #[test]
    fn test_bft_duration_full_sweep() {
        // SLS: 56 SSW + FBK + ACK = 1507344 symbols -> 856445 ns,
        // idle 114282 ns, SIFS 3000 ns.
        // BRP: 2 * 35752 + 14 * 5312 symbols -> 82881.8 ns, SIFS 3000 ns.
        assert_eq!(bft_duration(&bft_config(true, true)), 1_059_609);
    }

    #[test]
    fn test_bft_duration_initiator_sweep_only() {
        // 29 SSW + FBK + ACK -> 461141 ns, idle 70641 ns
        assert_eq!(bft_duration(&bft_config(true, false)), 620_664);
    }

    #[test]
    fn test_bft_duration_brp_only() {
        assert_eq!(bft_duration(&bft_config(false, true)), 85_882);
        assert_eq!(bft_duration(&bft_config(false, false)), 85_882);
    }

    #[test]
    fn test_brp_minimum_sectors() {
        let mut cfg = bft_config(false, false);
        cfg.initiator_sectors = 1;
        cfg.responder_sectors = 4;
        // Both sides are raised to two sectors
        let expected: f64 = (2.0 * 35_752.0 + 4.0 * 5_312.0) / 1.76 + 3_000.0;
        assert_eq!(bft_duration(&cfg), expected.round() as u64);
    }

    #[test]
    fn test_bft_multi_antenna_responder_uses_lbifs() {
        let mut single = bft_config(true, true);
        single.responder_sectors = 4;
        let mut dual = single;
        dual.responder_antennas = 2;
        assert!(bft_duration(&dual) > bft_duration(&single));
    }

    #[test]
    fn test_control_durations() {
        let mut durations = DurationSet::new();
        assert_eq!(durations.generate_cts().unwrap(), 14_059);
        assert_eq!(durations.generate_ack(1).unwrap(), 13_186);

        let mut block = DurationSet::new();
        assert_eq!(block.generate_ack(64).unwrap(), 18_859);
    }

    #[test]
    fn test_bti_per_allocation_count() {
        let mut durations = DurationSet::new();
        let one = durations.generate_bti(1).unwrap();
        let three = durations.generate_bti(3).unwrap();
        assert!(three > one);
        assert_eq!(durations.bti(1).unwrap(), one);
        assert_eq!(durations.bti(2), Err(StateError::UnsetDuration("BTI")));
        assert_eq!(
            durations.generate_bti(3),
            Err(StateError::DurationAlreadySet("BTI"))
        );
    }

    #[test]
    fn test_getters_fail_before_generation() {
        let durations = DurationSet::new();
        assert!(matches!(durations.guard_time(), Err(StateError::UnsetDuration(_))));
        assert!(matches!(durations.bft(), Err(StateError::UnsetDuration(_))));
        assert!(matches!(durations.data_ppdu(), Err(StateError::UnsetDuration(_))));
        assert!(matches!(durations.cts(), Err(StateError::UnsetDuration(_))));
        assert!(matches!(durations.ack(), Err(StateError::UnsetDuration(_))));
        assert!(matches!(
            durations.data_with_overhead(),
            Err(StateError::UnsetDuration(_))
        ));
    }

    #[test]
    fn test_durations_are_write_once() {
        let mut durations = DurationSet::new();
        durations.generate_guard_time(100_000_000).unwrap();
        assert_eq!(
            durations.generate_guard_time(50_000_000),
            Err(StateError::DurationAlreadySet("guard time"))
        );
        assert_eq!(durations.guard_time().unwrap(), 6_000);
    }

    #[test]
    fn test_data_with_overhead() {
        let mcs = *McsTable::default().get(McsIndex::new(6, 0)).unwrap();
        let mut durations = DurationSet::new();
        let data = durations.generate_data_ppdu(1524, &mcs).unwrap();
        let cts = durations.generate_cts().unwrap();
        let ack = durations.generate_ack(1).unwrap();

        let total = durations.generate_data_with_overhead(true, true).unwrap();
        assert_eq!(total, data + DIFS_NS + cts + SIFS_NS + ack + SIFS_NS);
    }

    #[test]
    fn test_data_with_overhead_requires_enabled_parts() {
        let mcs = *McsTable::default().get(McsIndex::new(1, 0)).unwrap();
        let mut durations = DurationSet::new();
        durations.generate_data_ppdu(1516, &mcs).unwrap();

        // ACK was never generated
        assert_eq!(
            durations.generate_data_with_overhead(false, true),
            Err(StateError::UnsetDuration("ACK"))
        );
        // Disabled parts are not needed
        let data = durations.data_ppdu().unwrap();
        assert_eq!(
            durations.generate_data_with_overhead(false, false).unwrap(),
            data + DIFS_NS
        );
    }
}
