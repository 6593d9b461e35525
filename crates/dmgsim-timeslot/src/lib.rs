//! # dmgsim-timeslot
//!
//! Hierarchical interval allocation for schedule construction.
//!
//! A schedule is a tree of timeslots: an allocatable slot hands out
//! non-overlapping sub-intervals of itself to its children and tracks what is
//! left. The whole tree lives in a [`TimeslotArena`] and is addressed through
//! [`SlotId`] handles.
//!
//! ## Example
//!
//! ```
//! use dmgsim_timeslot::{TimeslotArena, TimeslotError};
//!
//! let mut arena = TimeslotArena::new();
//! let channel = arena.add_root("channel", 0, 1_000);
//! arena.add_child(channel, "beacon", 0, 100)?;
//! assert_eq!(arena.available_time(channel)?, &[(100, 1_000)]);
//!
//! let overlap = arena.add_child(channel, "data", 50, 100);
//! assert!(matches!(overlap, Err(TimeslotError::OverlappingAllocation { .. })));
//! # Ok::<(), TimeslotError>(())
//! ```

mod arena;
mod available;
mod error;

pub use arena::{SlotBody, SlotId, Timeslot, TimeslotArena};
pub use available::AvailableTime;
pub use error::TimeslotError;

/// Time in nanoseconds.
pub type Nanos = u64;

/// Result type for timeslot operations.
pub type Result<T> = std::result::Result<T, TimeslotError>;
