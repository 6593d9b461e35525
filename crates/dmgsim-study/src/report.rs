//! Running a study end to end.

use crate::engine::{SlotKind, Strategy};
use crate::error::StudyError;
use crate::metrics::Metrics;
use crate::params::StudyParams;
use crate::study::{Aggregation, Study};
use dmgsim_phy::{BerTable, McsIndex, McsTable};
use dmgsim_timeslot::{Nanos, TimeslotArena};
use serde::Serialize;
use tracing::info;

/// Result of one study run.
#[derive(Debug, Clone, Serialize)]
pub struct StudyReport {
    pub strategy: Strategy,
    pub mcs: McsIndex,
    /// Throughput in Gbit/s.
    pub throughput_gbps: f64,
    pub aggregation: Aggregation,
    pub bft_duration_ns: Nanos,
    pub bft_period_ns: Nanos,
    pub bft_allocations: Vec<u64>,
    pub data_ppdu_duration_ns: Nanos,
    pub data_with_overhead_duration_ns: Nanos,
    pub guard_time_ns: Nanos,
    /// MSDU generation times (ns).
    pub generated: Vec<f64>,
    /// MSDU arrival times (ns).
    pub arrivals: Vec<f64>,
    /// Timeslot tree, descriptive strategy only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<TimeslotArena<SlotKind>>,
}

impl StudyReport {
    /// Per-MSDU latency (ns).
    pub fn latencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.arrivals
            .iter()
            .zip(&self.generated)
            .map(|(arrival, generated)| arrival - generated)
    }
}

/// Schedule a prepared study and compute its metrics.
pub fn run_prepared(study: &Study, strategy: Strategy) -> Result<StudyReport, StudyError> {
    let schedule = strategy.engine().schedule(study)?;
    let metrics = Metrics::calculate(
        schedule.arrivals,
        study.params().msdu_length_bytes,
        study.horizon(),
        study.generation_offset()?,
    )?;

    let durations = study.durations();
    let report = StudyReport {
        strategy,
        mcs: study.mcs().mcs,
        throughput_gbps: metrics.throughput_gbps,
        aggregation: *study.aggregation(),
        bft_duration_ns: durations.bft()?,
        bft_period_ns: study.bft_period(),
        bft_allocations: study.bft_allocations().to_vec(),
        data_ppdu_duration_ns: durations.data_ppdu()?,
        data_with_overhead_duration_ns: durations.data_with_overhead()?,
        guard_time_ns: durations.guard_time()?,
        generated: metrics.generated,
        arrivals: metrics.arrivals,
        channel: schedule.channel,
    };

    info!(
        %strategy,
        mcs = %report.mcs,
        throughput_gbps = report.throughput_gbps,
        msdus = report.arrivals.len(),
        "Study finished"
    );
    Ok(report)
}

/// Prepare and run one study.
///
/// # Arguments
///
/// * `params` - Parameter combination
/// * `mcs_table` - MCS definitions
/// * `ber_table` - BER results used for MCS selection
/// * `strategy` - Schedule engine to use
pub fn run_study(
    params: StudyParams,
    mcs_table: &McsTable,
    ber_table: &BerTable,
    strategy: Strategy,
) -> Result<StudyReport, StudyError> {
    let study = Study::prepare(params, mcs_table, ber_table)?;
    run_prepared(&study, strategy)
}
