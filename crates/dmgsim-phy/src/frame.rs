//! PPDU size calculation.
//!
//! Frame sizes follow the TXTIME equations of the DMG PHY (20.11.3 for the
//! control PHY, 20.12.3 for the SC PHY). All sizes are returned in symbols;
//! use [`symbols_to_ns`] to convert them to airtime.

use crate::constants::*;
use crate::error::PhyError;
use crate::mcs::{Mcs, Modulation};
use serde::{Deserialize, Serialize};

/// Acknowledgement policy of a data MPDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckPolicy {
    /// Immediate acknowledgement of a single MPDU.
    Normal,
    /// Block acknowledgement of an A-MPDU.
    Block,
}

/// Convert a PPDU size in symbols to nanoseconds, rounded to the nearest nanosecond.
pub fn symbols_to_ns(symbols: u64) -> u64 {
    (symbols as f64 / SYMBOL_RATE_GHZ).round() as u64
}

/// Calculate the PPDU size in symbols of a control mode frame.
///
/// Control mode uses a 3/4 code rate with shortening (zero bits are not
/// transmitted) and Ga32 spreading.
///
/// # Arguments
///
/// * `payload_bytes` - PSDU size in octets (usually a control frame)
pub fn control_frame_size(payload_bytes: u64) -> u64 {
    let codeword_bits = (payload_bytes as f64 - 6.0) * 8.0 / L_CWD as f64;
    let num_codewords = 1 + codeword_bits.ceil().max(0.0) as u64;

    let parity_symbols = L_CWD * num_codewords;
    // 5 header octets are carried together with the payload
    let data_symbols = (payload_bytes + 5) * 8;

    CONTROL_PPDU_PREAMBLE_LEN
        + CONTROL_PPDU_HEADER_LEN
        + (parity_symbols + data_symbols) * CONTROL_SPREADING_FACTOR
}

/// Calculate the PPDU size in symbols of an SC data frame.
///
/// # Arguments
///
/// * `payload_bytes` - PSDU length in octets
/// * `modulation` - SC modulation
/// * `code_rate` - LDPC code rate (1/2, 5/8, 3/4, 13/16, 7/8)
pub fn data_frame_size(payload_bytes: u64, modulation: Modulation, code_rate: f64) -> u64 {
    let num_codewords = payload_bytes as f64 * 8.0 / (LDPC_CODEWORD_LEN as f64 * code_rate);
    let num_blocks = (num_codewords * LDPC_CODEWORD_LEN as f64
        / modulation.coded_bits_per_block() as f64)
        .ceil() as u64;

    PPDU_PREAMBLE_LEN + PPDU_HEADER_LEN + num_blocks * SC_BLOCK_LEN + PPDU_GI_LENGTH
}

/// Calculate the length of a short A-MSDU in octets.
///
/// All subframes are assumed equal in size; every subframe but the last is
/// padded to a 4-octet boundary.
pub fn a_msdu_length(num_subframes: u64, subframe_length: u64) -> Result<u64, PhyError> {
    if num_subframes <= 1 {
        return Ok(subframe_length);
    }

    let end_padding = subframe_length % 4;
    let length = num_subframes * (2 + subframe_length) + (num_subframes - 1) * end_padding;

    if length > MAX_A_MSDU_LENGTH {
        return Err(PhyError::SizeExceeded {
            frame: "A-MSDU",
            size: length,
            max: MAX_A_MSDU_LENGTH,
        });
    }
    Ok(length)
}

/// Calculate the length of an A-MPDU in octets.
///
/// Same layout as [`a_msdu_length`] with a 4-octet delimiter per subframe.
/// The PSDU limit is enforced by [`max_a_mpdu_subframes`] instead.
pub fn a_mpdu_length(num_subframes: u64, subframe_length: u64) -> u64 {
    if num_subframes <= 1 {
        return subframe_length;
    }

    let end_padding = subframe_length % 4;
    num_subframes * (4 + subframe_length) + (num_subframes - 1) * end_padding
}

/// Calculate the length of a data MPDU in octets.
///
/// Adds the mandatory header fields and QoS control. With an acknowledgement
/// policy the "address 2" and "sequence control" fields are present as well.
pub fn data_mpdu_length(msdu_length: u64, ack_policy: Option<AckPolicy>) -> u64 {
    let mut length = 16 + msdu_length;
    if ack_policy.is_some() {
        length += 8;
    }
    length
}

/// Calculate the maximal number of A-MPDU subframes for one PPDU.
///
/// Bounded by both the 2 ms PPDU duration and the 262 143 octet PSDU limit.
pub fn max_a_mpdu_subframes(mcs: &Mcs, subframe_length: u64) -> u64 {
    let available_time = MAX_PPDU_TIME - PPDU_OVERHEAD_TIME;
    let num_symbols = (available_time as f64 * SYMBOL_RATE_GHZ) as u64;

    let data_share = 448.0 / SC_BLOCK_LEN as f64;
    let octets = (num_symbols as f64 * data_share * mcs.modulation.rate() as f64 * mcs.code_rate
        / 8.0) as u64;
    let octets = octets.min(MAX_PSDU_LENGTH);

    // The last subframe is padded as well
    let padding = subframe_length % 4;
    octets / (4 + subframe_length + padding)
}
