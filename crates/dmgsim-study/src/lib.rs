//! # dmgsim-study
//!
//! Nanosecond timing model of IEEE 802.11ad (DMG) beacon intervals.
//!
//! A study takes one parameter combination (channel quality, antenna setup,
//! mobility, aggregation and protection flags) and derives the MSDU arrival
//! times and throughput of a saturated downlink.
//!
//! ## Pipeline
//!
//! - **Preparation** ([`Study::prepare`]): MCS selection, BFT duration and
//!   allocation counts, frame aggregation, all timeslot durations
//! - **Scheduling** ([`ScheduleEngine`]): the [`DescriptiveEngine`] builds
//!   the full timeslot tree, the [`FastEngine`] computes data SPs directly
//! - **Metrics** ([`Metrics`]): throughput and per-MSDU generation times
//!
//! Runs are deterministic for a given [`StudyParams::seed`].

mod bft;
mod descriptive;
mod duration;
mod engine;
mod error;
mod fast;
mod metrics;
mod mobility;
mod params;
mod report;
mod study;

pub use bft::bft_allocations;
pub use descriptive::DescriptiveEngine;
pub use duration::{bft_duration, guard_time, BeamformingConfig, DurationSet};
pub use engine::{Schedule, ScheduleEngine, SlotKind, Strategy};
pub use error::{SchedulingError, StateError, StudyError};
pub use fast::FastEngine;
pub use metrics::Metrics;
pub use mobility::Mobility;
pub use params::{StudyParams, DEFAULT_BI_DURATION_NS, DEFAULT_OBSERVED_BI};
pub use report::{run_prepared, run_study, StudyReport};
pub use study::{Aggregation, Study};

/// Result type for study operations.
pub type Result<T> = std::result::Result<T, StudyError>;
