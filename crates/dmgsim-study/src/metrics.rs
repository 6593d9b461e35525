//! Throughput and MSDU latency samples.

use crate::error::SchedulingError;
use dmgsim_timeslot::Nanos;
use serde::Serialize;

/// Performance of one schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Throughput in Gbit/s (bits per ns).
    pub throughput_gbps: f64,
    /// MSDU generation times (ns).
    pub generated: Vec<f64>,
    /// MSDU arrival times (ns).
    pub arrivals: Vec<f64>,
}

impl Metrics {
    /// Derive throughput and generation times from MSDU arrivals.
    ///
    /// MSDUs are assumed to be generated uniformly over the horizon. If that
    /// puts any arrival before its generation, all generation times are moved
    /// earlier by the largest such violation. Finally generation times are
    /// moved back by `generation_offset`, the time a PPDU needs from the start
    /// of its exchange until it has been received.
    ///
    /// # Arguments
    ///
    /// * `arrivals` - MSDU arrival times (ns)
    /// * `msdu_length_bytes` - MSDU length in octets
    /// * `horizon` - Observed time (ns)
    /// * `generation_offset` - Data PPDU duration plus CTS overhead (ns)
    pub fn calculate(
        arrivals: Vec<f64>,
        msdu_length_bytes: u64,
        horizon: Nanos,
        generation_offset: f64,
    ) -> Result<Self, SchedulingError> {
        if arrivals.is_empty() {
            return Err(SchedulingError::NoDataUnits);
        }

        let count = arrivals.len();
        let horizon = horizon as f64;
        let throughput_gbps = (count as u64 * msdu_length_bytes * 8) as f64 / horizon;

        let spacing = horizon / count as f64;
        let mut generated: Vec<f64> = (0..count).map(|j| j as f64 * spacing).collect();

        let min_latency = arrivals
            .iter()
            .zip(&generated)
            .map(|(arrival, generated)| arrival - generated)
            .fold(f64::INFINITY, f64::min);
        let shift = min_latency.min(0.0) - generation_offset;
        for t in generated.iter_mut() {
            *t += shift;
        }

        Ok(Self {
            throughput_gbps,
            generated,
            arrivals,
        })
    }

    /// Per-MSDU latency (ns).
    pub fn latencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.arrivals
            .iter()
            .zip(&self.generated)
            .map(|(arrival, generated)| arrival - generated)
    }

    /// Number of MSDUs delivered.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}
