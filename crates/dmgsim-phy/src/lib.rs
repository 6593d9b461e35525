//! # dmgsim-phy
//!
//! IEEE 802.11ad (DMG) physical layer helpers for the DMGSim timing model.
//!
//! This crate provides the closed-form pieces every schedule is built from:
//!
//! - **Constants**: symbol rate, preamble/header lengths, inter-frame spaces
//!   and frame size limits ([`constants`])
//! - **MCS tables**: scheme lookup and BER-constrained MCS selection
//! - **Frame sizing**: control and SC data PPDU sizes, A-MSDU/A-MPDU lengths
//!
//! ## Example
//!
//! ```
//! use dmgsim_phy::{control_frame_size, select_mcs, symbols_to_ns, BerTable, McsIndex};
//!
//! // CTS frames are 20 octets sent in control mode
//! let cts_ns = symbols_to_ns(control_frame_size(20));
//! assert_eq!(cts_ns, 14_059);
//!
//! let ber = BerTable::new().with_row(5.0, [(McsIndex::new(1, 0), 0.0), (McsIndex::new(6, 0), 0.2)]);
//! assert_eq!(select_mcs(5.0, 1e-5, &ber)?, McsIndex::new(1, 0));
//! # Ok::<(), dmgsim_phy::PhyError>(())
//! ```

mod ber;
pub mod constants;
mod error;
mod frame;
mod mcs;

pub use ber::{select_mcs, BerTable};
pub use error::PhyError;
pub use frame::{
    a_mpdu_length, a_msdu_length, control_frame_size, data_frame_size, data_mpdu_length,
    max_a_mpdu_subframes, symbols_to_ns, AckPolicy,
};
pub use mcs::{Mcs, McsIndex, McsTable, Modulation};

/// Result type for PHY operations.
pub type Result<T> = std::result::Result<T, PhyError>;
