//! IEEE 802.11ad constants
//!
//! Most values follow the DMG PHY/MAC definitions of IEEE 802.11-2016
//! (clause 20 for the PHY, 10.39 for DMG channel access). Durations are in
//! nanoseconds, frame lengths in octets and PPDU parts in symbols.

// ============================================================================
// Single Carrier PHY
// ============================================================================

/// SC PHY chip rate in GHz (symbols per nanosecond).
pub const SYMBOL_RATE_GHZ: f64 = 1.76;
/// SC preamble length (STF + CEF) in symbols.
pub const PPDU_PREAMBLE_LEN: u64 = 3328;
/// SC header length in symbols.
pub const PPDU_HEADER_LEN: u64 = 1024;
/// Trailing guard interval after the last SC block, in symbols.
pub const PPDU_GI_LENGTH: u64 = 64;
/// Symbols per SC block (448 data + 64 guard interval).
pub const SC_BLOCK_LEN: u64 = 512;
/// LDPC codeword length in bits.
pub const LDPC_CODEWORD_LEN: u64 = 672;

// ============================================================================
// Control PHY
// ============================================================================

/// Control mode preamble length in symbols.
pub const CONTROL_PPDU_PREAMBLE_LEN: u64 = 7552;
/// Control mode header length in symbols.
pub const CONTROL_PPDU_HEADER_LEN: u64 = 40;
/// Maximum data bits carried in one MCS 0 codeword.
pub const L_CWD: u64 = 168;
/// Ga32 spreading factor applied to every control mode symbol.
pub const CONTROL_SPREADING_FACTOR: u64 = 32;

// ============================================================================
// Inter-frame spacing
// ============================================================================

/// Short inter-frame space.
pub const SIFS_NS: u64 = 3_000;
/// Distributed inter-frame space, closes every data exchange.
pub const DIFS_NS: u64 = 13_000;
/// Guard interval.
pub const GI_NS: u64 = 3_000;
/// Time for transmitting one SSW frame (24 bytes, control mode).
pub const TXTIME_SSW: u64 = 14_641;
/// Short beamforming inter-frame space.
pub const SBIFS_NS: u64 = 1_000;
/// Medium beamforming inter-frame space.
pub const MBIFS_NS: u64 = 3 * SIFS_NS;
/// Long beamforming inter-frame space.
pub const LBIFS_NS: u64 = TXTIME_SSW + 2 * SBIFS_NS;

// ============================================================================
// Frame size limits
// ============================================================================

/// Maximum MSDU length in octets.
pub const MAX_MSDU_LENGTH: u64 = 7920;
/// Maximum A-MSDU length in octets.
pub const MAX_A_MSDU_LENGTH: u64 = 7935;
/// Maximum PSDU length in octets.
pub const MAX_PSDU_LENGTH: u64 = 262_143;
/// Maximum PPDU duration.
pub const MAX_PPDU_TIME: u64 = 2_000_000;
/// Preamble + header + first guard interval of an SC PPDU (2509.09 ns, truncated).
pub const PPDU_OVERHEAD_TIME: u64 = 2_509;

// ============================================================================
// Beamforming and geometry
// ============================================================================

/// AGC and TRN field length for a single sector, in symbols.
pub const AGC_AND_TRN_LENGTH: u64 = 5_312;
/// Share of the antenna sectors trained during BRP.
pub const BRP_SECTOR_QUOTA: f64 = 0.25;
/// Minimum number of sectors trained per side during BRP.
pub const BRP_MIN_SECTORS: u64 = 2;
/// Users move on a fixed-distance circle around the AP.
pub const UE_TO_AP_DISTANCE_M: f64 = 5.0;

// ============================================================================
// Synchronization
// ============================================================================

/// Worst-case clock drift between stations in parts per million.
pub const CLOCK_DRIFT_PPM: u64 = 20;
/// Propagation and implementation margin added to the guard time.
pub const GUARD_TIME_MARGIN_NS: u64 = 100;
