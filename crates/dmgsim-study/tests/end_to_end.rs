//! End-to-end tests for study runs
//!
//! These tests prepare and schedule complete studies and check the properties
//! every run must satisfy regardless of the engine used.
//!
//! ## Test Strategy
//!
//! 1. **Reference Run**: 1500 octet MSDUs, no aggregation, no self-CTS, ACK,
//!    one user with a single 28-sector antenna, static, Eb/N0 5 dB and a BER
//!    limit of 1e-5 over ten 100 ms beacon intervals.
//!
//! 2. **Determinism**: identical parameters give identical reports, and the
//!    seed only moves the fallback BFT.
//!
//! 3. **Failure Modes**: unsatisfiable BER limits and overcrowded beacon
//!    intervals abort the run without results.

use dmgsim_phy::{BerTable, McsIndex, McsTable, PhyError};
use dmgsim_study::{
    run_study, Mobility, SchedulingError, SlotKind, Strategy, StudyError, StudyParams,
    StudyReport,
};
use dmgsim_timeslot::TimeslotError;

// ============================================================================
// Fixtures
// ============================================================================

fn ber_table() -> BerTable {
    let mcs = |major, minor| McsIndex::new(major, minor);
    BerTable::new()
        .with_row(
            5.0,
            [
                (mcs(1, 0), 0.0),
                (mcs(2, 0), 0.0),
                (mcs(6, 0), 0.0),
                (mcs(9, 1), 0.0),
                (mcs(10, 0), 2.0e-6),
                (mcs(11, 0), 8.0e-6),
                (mcs(12, 0), 4.0e-5),
                (mcs(12, 1), 3.0e-4),
                (mcs(12, 6), 0.2),
            ],
        )
        .with_row(0.0, [(mcs(1, 0), 1.0e-3), (mcs(2, 0), 1.0e-2)])
}

fn reference_params() -> StudyParams {
    StudyParams {
        eb_n0: 5.0,
        max_ber: 1e-5,
        initiator_antennas: 1,
        initiator_sectors: 28,
        responder_antennas: 1,
        responder_sectors: None,
        enable_sls: true,
        enable_responder_txss: false,
        mobility: Mobility::Static,
        msdu_length_bytes: 1500,
        msdu_aggregation: false,
        mpdu_aggregation: false,
        self_cts: false,
        ack: true,
        num_users: 1,
        bi_duration_ns: 100_000_000,
        observed_bi: 10,
        seed: 0,
    }
}

fn run(params: StudyParams, strategy: Strategy) -> Result<StudyReport, StudyError> {
    run_study(params, &McsTable::default(), &ber_table(), strategy)
}

// ============================================================================
// Reference run
// ============================================================================

#[test]
fn test_reference_run_succeeds() {
    for strategy in Strategy::ALL {
        let report = run(reference_params(), strategy).expect("reference run failed");

        // 8e-6 rounds to the limit, 4e-5 exceeds it
        assert_eq!(report.mcs, McsIndex::new(11, 0));
        assert!(report.throughput_gbps > 0.0);
        assert!(
            report.throughput_gbps < 1.0,
            "{} throughput {}",
            strategy,
            report.throughput_gbps
        );
        assert_eq!(report.generated.len(), report.arrivals.len());
        assert_eq!(report.bft_allocations.iter().sum::<u64>(), 1);
    }
}

#[test]
fn test_arrivals_non_decreasing_within_bi() {
    let bi = reference_params().bi_duration_ns as f64;
    for strategy in Strategy::ALL {
        let report = run(reference_params(), strategy).unwrap();
        for pair in report.arrivals.windows(2) {
            if (pair[0] / bi).floor() == (pair[1] / bi).floor() {
                assert!(pair[0] <= pair[1], "{}: {} > {}", strategy, pair[0], pair[1]);
            }
        }
        // Nothing arrives outside the observed horizon
        let horizon = bi * 10.0;
        assert!(report.arrivals.iter().all(|&t| t > 0.0 && t < horizon));
    }
}

#[test]
fn test_latency_covers_ppdu_duration() {
    for strategy in Strategy::ALL {
        let report = run(reference_params(), strategy).unwrap();
        let ppdu = report.data_ppdu_duration_ns as f64;
        let min = report.latencies().fold(f64::INFINITY, f64::min);
        assert!(min >= ppdu - 1e-6, "{}: min latency {}", strategy, min);
    }
}

#[test]
fn test_channel_tree_only_for_descriptive() {
    let descriptive = run(reference_params(), Strategy::Descriptive).unwrap();
    let arena = descriptive.channel.expect("descriptive run keeps its tree");
    let count = |kind: SlotKind| arena.iter().filter(|slot| slot.kind == kind).count();
    assert_eq!(count(SlotKind::Channel), 1);
    assert_eq!(count(SlotKind::BeaconInterval), 10);
    assert_eq!(count(SlotKind::Bti), 10);
    assert_eq!(count(SlotKind::BftSp), 1);
    assert_eq!(count(SlotKind::DataSp), 11);
    assert_eq!(count(SlotKind::SelfCts), 0);
    assert_eq!(count(SlotKind::DataPpdu), descriptive.arrivals.len());
    assert_eq!(count(SlotKind::Ack), descriptive.arrivals.len());

    let fast = run(reference_params(), Strategy::Fast).unwrap();
    assert!(fast.channel.is_none());
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_params_identical_reports() {
    for strategy in Strategy::ALL {
        let a = run(reference_params(), strategy).unwrap();
        let b = run(reference_params(), strategy).unwrap();
        assert_eq!(a.bft_allocations, b.bft_allocations);
        assert_eq!(a.arrivals, b.arrivals);
        assert_eq!(a.generated, b.generated);
        assert_eq!(a.throughput_gbps, b.throughput_gbps);
    }
}

#[test]
fn test_seed_moves_fallback_bft() {
    let placements: std::collections::BTreeSet<Vec<u64>> = (0..32)
        .map(|seed| {
            let mut params = reference_params();
            params.seed = seed;
            run(params, Strategy::Fast).unwrap().bft_allocations
        })
        .collect();
    assert!(placements.len() > 1);
    for placement in &placements {
        assert_eq!(placement.iter().sum::<u64>(), 1);
    }
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_unsatisfiable_ber_fails() {
    let mut params = reference_params();
    params.eb_n0 = 0.0;
    for strategy in Strategy::ALL {
        let result = run(params.clone(), strategy);
        assert!(matches!(
            result,
            Err(StudyError::Phy(PhyError::ConstraintUnsatisfiable { .. }))
        ));
    }
}

#[test]
fn test_unknown_eb_n0_fails() {
    let mut params = reference_params();
    params.eb_n0 = 2.5;
    assert!(matches!(
        run(params, Strategy::Fast),
        Err(StudyError::Phy(PhyError::UnknownEbN0(_)))
    ));
}

#[test]
fn test_overcrowded_beacon_interval_fails() {
    // Full sweeps of 8.3 ms every 5.6 ms overlap each other
    let mut params = reference_params();
    params.initiator_antennas = 4;
    params.initiator_sectors = 64;
    params.enable_responder_txss = true;
    params.mobility = Mobility::Angular(1_000);

    for strategy in Strategy::ALL {
        let result = run(params.clone(), strategy);
        assert!(
            matches!(
                result,
                Err(StudyError::Scheduling(SchedulingError::Timeslot(
                    TimeslotError::OverlappingAllocation { .. }
                )))
            ),
            "{}: {:?}",
            strategy,
            result.map(|report| report.throughput_gbps)
        );
    }
}
