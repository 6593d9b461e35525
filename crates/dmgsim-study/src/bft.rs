//! Distribution of beamforming trainings over the observed beacon intervals.

use crate::error::StudyError;
use dmgsim_timeslot::Nanos;
use rand::Rng;
use tracing::warn;

/// Number of BFT allocations in each observed beacon interval.
///
/// Trainings repeat every `bft_period` ns. A fractional per-BI rate is spread
/// with a running carry: each BI receives the integer part of the accumulated
/// rate and keeps the remainder. When the period exceeds the whole horizon a
/// single training is placed in a random BI instead.
///
/// Every user contributes the same pattern, shifted by one BI per user index,
/// since the users' trainings are assumed out of phase.
///
/// # Arguments
///
/// * `observed_bi` - Number of observed beacon intervals
/// * `bi_duration` - Beacon interval duration (ns)
/// * `bft_period` - Target beamforming period (ns)
/// * `num_users` - Number of equally prioritised users
/// * `rng` - Source for the fallback placement
pub fn bft_allocations<R: Rng>(
    observed_bi: usize,
    bi_duration: Nanos,
    bft_period: Nanos,
    num_users: usize,
    rng: &mut R,
) -> Result<Vec<u64>, StudyError> {
    if observed_bi == 0 {
        return Err(StudyError::InvalidParams(
            "At least one beacon interval must be observed".to_string(),
        ));
    }
    if bft_period == 0 {
        return Err(StudyError::InvalidParams(
            "Beamforming period must be positive".to_string(),
        ));
    }

    let horizon = observed_bi as u64 * bi_duration;
    let mut per_bi = vec![0u64; observed_bi];

    if bft_period > horizon {
        let idx = rng.gen_range(0..observed_bi);
        warn!(
            bft_period,
            horizon,
            bi = idx,
            "BFT period exceeds the observed horizon, placing a single BFT allocation"
        );
        per_bi[idx] = 1;
    } else {
        // Carry kept in ns so that the total is exactly horizon / period
        let mut carry: Nanos = 0;
        for count in per_bi.iter_mut() {
            carry += bi_duration;
            *count = carry / bft_period;
            carry %= bft_period;
        }
    }

    Ok(roll_sum(&per_bi, num_users))
}

/// Sum of `shifts` copies of `pattern`, the i-th rotated right by i positions.
fn roll_sum(pattern: &[u64], shifts: usize) -> Vec<u64> {
    let len = pattern.len();
    let mut total = vec![0u64; len];
    for shift in 0..shifts {
        for (j, slot) in total.iter_mut().enumerate() {
            *slot += pattern[(j + len - shift % len) % len];
        }
    }
    total
}
