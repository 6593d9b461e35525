//! Error types for study preparation and scheduling.

use dmgsim_phy::PhyError;
use dmgsim_timeslot::TimeslotError;
use thiserror::Error;

/// Errors that can occur while preparing or running a study.
#[derive(Debug, Error)]
pub enum StudyError {
    /// MCS selection or frame sizing failed.
    #[error(transparent)]
    Phy(#[from] PhyError),

    /// The parameters produce an inconsistent schedule.
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    /// A value was read before it was generated.
    #[error(transparent)]
    State(#[from] StateError),

    /// Parameter validation failed.
    #[error("Invalid study parameters: {0}")]
    InvalidParams(String),
}

impl From<TimeslotError> for StudyError {
    fn from(err: TimeslotError) -> Self {
        StudyError::Scheduling(SchedulingError::Timeslot(err))
    }
}

/// Geometrically inconsistent schedules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    /// A timeslot did not fit its parent.
    #[error(transparent)]
    Timeslot(#[from] TimeslotError),

    /// The per-user share of a data SP ends before its first arrival.
    #[error("Negative user DATA-SP duration: first arrival {first} ns after last possible {last} ns")]
    InsufficientPerUserAllocation {
        /// Earliest arrival time in the SP (ns).
        first: f64,
        /// Latest allowed arrival time in the user's share (ns).
        last: f64,
    },

    /// Not a single data unit could be scheduled.
    #[error("No data units were scheduled")]
    NoDataUnits,
}

/// Sequencing defects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A getter ran before the named duration was generated.
    #[error("Tried fetching unset {0} duration")]
    UnsetDuration(&'static str),

    /// A generator ran twice for the named duration.
    #[error("The {0} duration was already generated")]
    DurationAlreadySet(&'static str),
}
