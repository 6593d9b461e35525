//! Closed-form schedule engine.
//!
//! Beacon intervals with the same number of data SPs share one layout, so
//! the relative arrival times are computed once per distinct allocation count
//! and then shifted to every BI that uses it.

use crate::engine::{user_share_end, Schedule, ScheduleEngine};
use crate::error::StudyError;
use crate::study::Study;
use dmgsim_phy::constants::{DIFS_NS, SIFS_NS};
use dmgsim_timeslot::{Nanos, TimeslotError};
use std::collections::BTreeMap;
use std::iter;
use tracing::trace;

/// Engine computing data SP boundaries and arrivals directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastEngine;

impl ScheduleEngine for FastEngine {
    fn schedule(&self, study: &Study) -> Result<Schedule, StudyError> {
        let params = study.params();
        let durations = study.durations();

        let guard_time = durations.guard_time()? as f64;
        let bft = durations.bft()? as f64;
        let data = durations.data_ppdu()? as f64;
        let cts_overhead = match params.self_cts {
            true => (durations.cts()? + SIFS_NS) as f64,
            false => 0.0,
        };
        let ack_overhead = match params.ack {
            true => (SIFS_NS + durations.ack()?) as f64,
            false => 0.0,
        };

        // Arrival of the first PSDU excludes the trailing SIFS, ACK and DIFS
        let first_offset = cts_overhead + data;
        let period = cts_overhead + data + ack_overhead + DIFS_NS as f64;
        let msdus_per_psdu = study.aggregation().msdus_per_psdu() as usize;
        let end = params.bi_duration_ns as f64 - guard_time;

        let mut layouts: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
        for &num_data in study.data_allocations() {
            if layouts.contains_key(&num_data) {
                continue;
            }

            let begin = durations.bti(num_data)? as f64 + guard_time;
            let mut relative = Vec::new();
            for (sp_start, sp_end) in data_sp_bounds(begin, end, num_data, bft, guard_time)? {
                let first = sp_start + first_offset;
                let last = user_share_end(sp_start, sp_end, first, params.num_users, guard_time)?;
                for arrival in arithmetic_range(first, last, period) {
                    relative.extend(iter::repeat(arrival).take(msdus_per_psdu));
                }
            }

            trace!(num_data, arrivals = relative.len(), "Computed BI layout");
            layouts.insert(num_data, relative);
        }

        let mut arrivals = Vec::new();
        for (i, num_data) in study.data_allocations().iter().enumerate() {
            let offset = i as f64 * params.bi_duration_ns as f64;
            if let Some(relative) = layouts.get(num_data) {
                arrivals.extend(relative.iter().map(|t| t + offset));
            }
        }

        Ok(Schedule {
            arrivals,
            channel: None,
        })
    }
}

/// Data SP `(start, end)` pairs of a BI with `count` data SPs.
///
/// `[begin, end]` is divided evenly; half a BFT plus a guard time is removed
/// on each side of every internal division point. Fails when a data SP would
/// end before it starts, i.e. when neighbouring BFT SPs overlap.
fn data_sp_bounds(
    begin: f64,
    end: f64,
    count: u64,
    bft: f64,
    guard_time: f64,
) -> Result<Vec<(f64, f64)>, TimeslotError> {
    let span = (end - begin) / count as f64;
    let cut = bft / 2.0 + guard_time;

    let mut points = Vec::with_capacity(2 * count as usize);
    points.push(begin);
    for k in 1..count {
        let division = begin + k as f64 * span;
        points.push(division - cut);
        points.push(division + cut);
    }
    points.push(end);

    let bounds: Vec<(f64, f64)> = points.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
    if let Some(&(start, end)) = bounds.iter().find(|(start, end)| end < start) {
        return Err(TimeslotError::OverlappingAllocation {
            start: end.round() as Nanos,
            end: start.round() as Nanos,
        });
    }
    Ok(bounds)
}

/// `start, start + step, ...` up to but excluding `stop`.
fn arithmetic_range(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> {
    let len = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..len).map(move |k| start + k as f64 * step)
}
