//! Schedule engine seam.
//!
//! Two interchangeable engines turn a prepared [`Study`] into data PPDU
//! arrival times:
//!
//! - [`DescriptiveEngine`](crate::DescriptiveEngine) builds the full timeslot
//!   tree of every beacon interval and reads arrivals off its leaves.
//! - [`FastEngine`](crate::FastEngine) computes the data SP boundaries in
//!   closed form and generates arrivals as arithmetic sequences.
//!
//! Guard times are placed slightly differently by the two, so their results
//! may differ by a few microseconds of latency, but throughput agrees within
//! one percent.

use crate::descriptive::DescriptiveEngine;
use crate::error::{SchedulingError, StudyError};
use crate::fast::FastEngine;
use crate::study::Study;
use dmgsim_timeslot::TimeslotArena;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind tag of the timeslots built by the descriptive engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Whole observed horizon.
    Channel,
    BeaconInterval,
    /// Beacon transmission interval.
    Bti,
    /// Beamforming training service period.
    BftSp,
    /// Data service period.
    DataSp,
    SelfCts,
    DataPpdu,
    Ack,
}

/// Output of a schedule engine.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// MSDU arrival times (ns from the start of the horizon), non-decreasing
    /// within each beacon interval.
    pub arrivals: Vec<f64>,
    /// Timeslot tree, descriptive engine only.
    pub channel: Option<TimeslotArena<SlotKind>>,
}

/// Turns a prepared study into a schedule.
pub trait ScheduleEngine {
    fn schedule(&self, study: &Study) -> Result<Schedule, StudyError>;
}

/// Selects a schedule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Explicit timeslot tree.
    Descriptive,
    /// Closed-form data SP boundaries.
    #[default]
    Fast,
}

impl Strategy {
    /// Both strategies, descriptive first.
    pub const ALL: [Strategy; 2] = [Strategy::Descriptive, Strategy::Fast];

    /// Engine implementing this strategy.
    pub fn engine(self) -> &'static dyn ScheduleEngine {
        match self {
            Strategy::Descriptive => &DescriptiveEngine,
            Strategy::Fast => &FastEngine,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Descriptive => write!(f, "descriptive"),
            Strategy::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for Strategy {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descriptive" => Ok(Strategy::Descriptive),
            "fast" => Ok(Strategy::Fast),
            other => Err(StudyError::InvalidParams(format!(
                "Unknown strategy '{}', expected 'descriptive' or 'fast'",
                other
            ))),
        }
    }
}

/// Last possible arrival in the observed user's share of a data SP.
///
/// With several users the SP is divided equally: the user keeps `1/num_users`
/// of the net SP and gives up half a guard time to its neighbour.
pub(crate) fn user_share_end(
    sp_start: f64,
    sp_end: f64,
    first_arrival: f64,
    num_users: usize,
    guard_time: f64,
) -> Result<f64, SchedulingError> {
    if num_users <= 1 {
        return Ok(sp_end);
    }

    let shortening = (sp_end - sp_start) * (1.0 - 1.0 / num_users as f64) + guard_time / 2.0;
    let last = sp_end - shortening;
    if last < first_arrival {
        return Err(SchedulingError::InsufficientPerUserAllocation {
            first: first_arrival,
            last,
        });
    }
    Ok(last)
}
