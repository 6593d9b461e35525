//! Serializable results of single runs and strategy comparisons.

use chrono::{DateTime, Utc};
use dmgsim_phy::{McsIndex, PhyError};
use dmgsim_study::{Strategy, StudyError, StudyParams, StudyReport};
use serde::Serialize;

/// Outcome code of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i32")]
pub enum RunStatus {
    /// Run finished with results.
    Ok,
    /// No MCS meets the BER limit.
    ConstraintUnsatisfiable,
    /// Any other failure, including schedules that do not fit.
    Failed,
}

impl RunStatus {
    /// Classify a study error.
    pub fn from_error(err: &StudyError) -> Self {
        match err {
            StudyError::Phy(PhyError::ConstraintUnsatisfiable { .. }) => {
                RunStatus::ConstraintUnsatisfiable
            }
            _ => RunStatus::Failed,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            RunStatus::Ok => 0,
            RunStatus::ConstraintUnsatisfiable => 1,
            RunStatus::Failed => -1,
        }
    }
}

impl From<RunStatus> for i32 {
    fn from(status: RunStatus) -> Self {
        status.code()
    }
}

/// Record of one study run.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub params: StudyParams,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub mcs: Option<McsIndex>,
    pub throughput_gbps: Option<f64>,
    /// Number of delivered MSDUs.
    pub num_msdus: usize,
    pub mean_latency_ns: Option<f64>,
    pub max_latency_ns: Option<f64>,
    /// MSDU generation times (ns), only with raw times enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<Vec<f64>>,
    /// MSDU arrival times (ns), only with raw times enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrivals: Option<Vec<f64>>,
}

impl RunRecord {
    /// Build a record from the outcome of a run that began at `started_at`.
    pub fn from_outcome(
        params: StudyParams,
        strategy: Strategy,
        started_at: DateTime<Utc>,
        outcome: Result<StudyReport, StudyError>,
        raw_times: bool,
    ) -> Self {
        let mut record = RunRecord {
            started_at,
            finished_at: Utc::now(),
            strategy,
            params,
            status: RunStatus::Ok,
            error: None,
            mcs: None,
            throughput_gbps: None,
            num_msdus: 0,
            mean_latency_ns: None,
            max_latency_ns: None,
            generated: None,
            arrivals: None,
        };

        match outcome {
            Ok(report) => {
                let (sum, max) = report
                    .latencies()
                    .fold((0.0, f64::NEG_INFINITY), |(sum, max), l| (sum + l, f64::max(max, l)));
                let count = report.arrivals.len();

                record.mcs = Some(report.mcs);
                record.throughput_gbps = Some(report.throughput_gbps);
                record.num_msdus = count;
                if count > 0 {
                    record.mean_latency_ns = Some(sum / count as f64);
                    record.max_latency_ns = Some(max);
                }
                if raw_times {
                    record.generated = Some(report.generated);
                    record.arrivals = Some(report.arrivals);
                }
            }
            Err(err) => {
                record.status = RunStatus::from_error(&err);
                record.error = Some(err.to_string());
            }
        }
        record
    }

    pub fn is_ok(&self) -> bool {
        self.status == RunStatus::Ok
    }
}

/// Both strategies run on the same parameters.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub descriptive: RunRecord,
    pub fast: RunRecord,
    /// |descriptive − fast| / descriptive throughput, when both succeeded.
    pub relative_difference: Option<f64>,
}

impl Comparison {
    pub fn new(descriptive: RunRecord, fast: RunRecord) -> Self {
        let relative_difference = match (descriptive.throughput_gbps, fast.throughput_gbps) {
            (Some(d), Some(f)) if d > 0.0 => Some((d - f).abs() / d),
            _ => None,
        };
        Self {
            descriptive,
            fast,
            relative_difference,
        }
    }
}
