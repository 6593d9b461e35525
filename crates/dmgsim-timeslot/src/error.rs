//! Error types for timeslot allocation.

use crate::{Nanos, SlotId};
use thiserror::Error;

/// Errors that can occur when allocating timeslots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeslotError {
    /// No free range contains the requested span.
    #[error("Insufficient time for [{start}, {end}] ns")]
    InsufficientTime {
        /// Requested start (ns).
        start: Nanos,
        /// Requested end (ns).
        end: Nanos,
    },

    /// The requested span straddles the edge of a free range.
    #[error("Tried fitting overlapping timeslot [{start}, {end}] ns")]
    OverlappingAllocation {
        /// Requested start (ns).
        start: Nanos,
        /// Requested end (ns).
        end: Nanos,
    },

    /// No slot with the given id exists in the arena.
    #[error("Unknown timeslot {0}")]
    UnknownSlot(SlotId),

    /// Children were requested from a leaf slot.
    #[error("Timeslot {0} cannot hold children")]
    NotAllocatable(SlotId),
}
