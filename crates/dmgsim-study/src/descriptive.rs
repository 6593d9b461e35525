//! Schedule engine building the explicit timeslot tree.
//!
//! Channel → beacon intervals → {BTI, BFT SPs, data SPs} → {self-CTS, data
//! PPDU, ACK}. Slow and memory hungry for long horizons, but every slot can
//! be inspected afterwards.

use crate::engine::{user_share_end, Schedule, ScheduleEngine, SlotKind};
use crate::error::StudyError;
use crate::study::Study;
use dmgsim_phy::constants::SIFS_NS;
use dmgsim_timeslot::{Nanos, SlotId, TimeslotArena, TimeslotError};
use std::iter;
use tracing::trace;

/// Engine building one timeslot per BTI, SP and frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptiveEngine;

/// Durations of one data exchange.
struct Exchange {
    cts: Option<Nanos>,
    data: Nanos,
    ack: Option<Nanos>,
    /// Exchange including IFS and the trailing DIFS.
    total: Nanos,
}

impl ScheduleEngine for DescriptiveEngine {
    fn schedule(&self, study: &Study) -> Result<Schedule, StudyError> {
        let params = study.params();
        let durations = study.durations();

        let bi_duration = params.bi_duration_ns;
        let guard_time = durations.guard_time()?;
        let bft = durations.bft()?;
        let exchange = Exchange {
            cts: params.self_cts.then(|| durations.cts()).transpose()?,
            data: durations.data_ppdu()?,
            ack: params.ack.then(|| durations.ack()).transpose()?,
            total: durations.data_with_overhead()?,
        };
        let msdus_per_psdu = study.aggregation().msdus_per_psdu() as usize;

        let mut arena = TimeslotArena::new();
        let channel = arena.add_root(SlotKind::Channel, 0, study.horizon());
        let mut arrivals = Vec::new();

        for (i, (&num_data, &num_bft)) in study
            .data_allocations()
            .iter()
            .zip(study.bft_allocations())
            .enumerate()
        {
            let bi_start = i as Nanos * bi_duration;
            let bi = arena.add_allocatable_child(
                channel,
                SlotKind::BeaconInterval,
                bi_start,
                bi_duration,
            )?;
            arena.add_child(bi, SlotKind::Bti, bi_start, durations.bti(num_data)?)?;

            if num_bft > 0 {
                place_bft_sps(&mut arena, bi, num_bft, bft)?;
            }

            let free = arena.available_time(bi)?.to_vec();
            let mut data_sps = Vec::with_capacity(free.len());
            for (start, end) in free {
                // Guard time at both ends
                let duration = (end - start).checked_sub(2 * guard_time).ok_or(
                    TimeslotError::InsufficientTime {
                        start: start + guard_time,
                        end: end.saturating_sub(guard_time),
                    },
                )?;
                data_sps.push(arena.add_allocatable_child(
                    bi,
                    SlotKind::DataSp,
                    start + guard_time,
                    duration,
                )?);
            }

            for sp in data_sps {
                let tx_ends = fill_data_sp(&mut arena, sp, &exchange, params.num_users, guard_time)?;
                for end in tx_ends {
                    arrivals.extend(iter::repeat(end as f64).take(msdus_per_psdu));
                }
            }

            trace!(bi = i, num_bft, num_data, "Built beacon interval");
        }

        Ok(Schedule {
            arrivals,
            channel: Some(arena),
        })
    }
}

/// Spread `count` BFT SPs evenly over the first free range of `bi`, centered
/// on the division points.
fn place_bft_sps(
    arena: &mut TimeslotArena<SlotKind>,
    bi: SlotId,
    count: u64,
    bft: Nanos,
) -> Result<(), StudyError> {
    let slot = arena.get(bi)?;
    let (start, end) = arena
        .available_time(bi)?
        .first()
        .copied()
        .ok_or(TimeslotError::InsufficientTime {
            start: slot.start,
            end: slot.end(),
        })?;

    let step = (end - start) as f64 / (count + 1) as f64;
    for idx in 0..count {
        let timestamp = ((idx + 1) as f64 * step - bft as f64 / 2.0 + start as f64).round();
        if timestamp < 0.0 {
            return Err(TimeslotError::InsufficientTime {
                start,
                end: start + bft,
            }
            .into());
        }
        arena.add_child(bi, SlotKind::BftSp, timestamp as Nanos, bft)?;
    }
    Ok(())
}

/// Place back-to-back data exchanges into a data SP.
///
/// Returns the end times of the data PPDUs.
fn fill_data_sp(
    arena: &mut TimeslotArena<SlotKind>,
    sp: SlotId,
    exchange: &Exchange,
    num_users: usize,
    guard_time: Nanos,
) -> Result<Vec<Nanos>, StudyError> {
    let slot = arena.get(sp)?;
    let sp_start = slot.start;

    let first_arrival = sp_start + exchange.cts.map_or(0, |cts| cts + SIFS_NS) + exchange.data;
    let usable_end = user_share_end(
        sp_start as f64,
        slot.end() as f64,
        first_arrival as f64,
        num_users,
        guard_time as f64,
    )?;
    let num_exchanges = ((usable_end - sp_start as f64) / exchange.total as f64).floor() as u64;

    let mut tx_ends = Vec::with_capacity(num_exchanges as usize);
    for n in 0..num_exchanges {
        let mut timestamp = sp_start + n * exchange.total;

        if let Some(cts) = exchange.cts {
            arena.add_child(sp, SlotKind::SelfCts, timestamp, cts)?;
            timestamp += cts + SIFS_NS;
        }

        arena.add_child(sp, SlotKind::DataPpdu, timestamp, exchange.data)?;
        timestamp += exchange.data;
        tx_ends.push(timestamp);
        timestamp += SIFS_NS;

        if let Some(ack) = exchange.ack {
            arena.add_child(sp, SlotKind::Ack, timestamp, ack)?;
        }
    }
    Ok(tx_ends)
}
