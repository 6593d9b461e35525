//! Performance benchmarks for the schedule engines.
//!
//! ## Running the benchmarks
//!
//! ```bash
//! cargo bench -p dmgsim-study
//! ```
//!
//! ## Benchmarks included
//!
//! - `prepare` - MCS selection, BFT allocation and duration generation
//! - `schedule/<strategy>/N` - Scheduling N observed beacon intervals

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dmgsim_phy::{BerTable, McsIndex, McsTable};
use dmgsim_study::{Mobility, ScheduleEngine, Strategy, Study, StudyParams};

fn params(observed_bi: usize) -> StudyParams {
    StudyParams {
        eb_n0: 5.0,
        max_ber: 1e-5,
        initiator_antennas: 1,
        initiator_sectors: 28,
        responder_antennas: 1,
        responder_sectors: None,
        enable_sls: true,
        enable_responder_txss: false,
        mobility: Mobility::Angular(60),
        msdu_length_bytes: 1500,
        msdu_aggregation: false,
        mpdu_aggregation: false,
        self_cts: false,
        ack: true,
        num_users: 1,
        bi_duration_ns: 100_000_000,
        observed_bi,
        seed: 0,
    }
}

fn ber_table() -> BerTable {
    BerTable::new().with_row(5.0, [(McsIndex::new(11, 0), 0.0)])
}

/// Benchmark study preparation.
fn bench_prepare(c: &mut Criterion) {
    let mcs = McsTable::default();
    let ber = ber_table();
    c.bench_function("prepare", |b| {
        b.iter(|| Study::prepare(black_box(params(10)), &mcs, &ber))
    });
}

/// Benchmark both engines over growing horizons.
fn bench_schedule(c: &mut Criterion) {
    let mcs = McsTable::default();
    let ber = ber_table();
    let mut group = c.benchmark_group("schedule");
    group.sample_size(10); // The descriptive tree holds every frame

    for observed_bi in [1, 10, 50] {
        let study = match Study::prepare(params(observed_bi), &mcs, &ber) {
            Ok(study) => study,
            Err(err) => panic!("Benchmark study failed to prepare: {}", err),
        };
        group.throughput(Throughput::Elements(observed_bi as u64));

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), observed_bi),
                &study,
                |b, study| b.iter(|| strategy.engine().schedule(black_box(study))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_prepare, bench_schedule);
criterion_main!(benches);
