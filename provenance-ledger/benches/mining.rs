//! Mining cost by difficulty

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use provenance_ledger::{HashAlgorithm, Miner, Record};
use serde_json::json;

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("mine");
    group.sample_size(20);

    for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
        for difficulty in 1..=3u32 {
            let miner = Miner::new(difficulty).with_algorithm(algorithm);
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), difficulty),
                &miner,
                |b, miner| {
                    b.iter(|| {
                        let mut record = Record::with_algorithm(
                            1,
                            "2024-01-01T00:00:00.000Z",
                            json!({"event": "Shipped", "location": "Factory A to Distributor"}),
                            "0",
                            algorithm,
                        );
                        black_box(record.mine_with(miner).unwrap())
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let record = Record::new(
        1,
        "2024-01-01T00:00:00.000Z",
        json!({"event": "Received", "location": "Distributor Warehouse", "details": "Stored."}),
        "0",
    );
    c.bench_function("compute_fingerprint", |b| {
        b.iter(|| black_box(record.compute_fingerprint()))
    });
}

criterion_group!(benches, bench_mining, bench_fingerprint);
criterion_main!(benches);
