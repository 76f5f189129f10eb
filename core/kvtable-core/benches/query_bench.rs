//! Indexed equality lookup vs bounded scan filter.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kvtable_core::{EngineConfig, MemoryStore, TableEngine};

const ROWS: u64 = 10_000;

fn populated_engine() -> TableEngine<MemoryStore> {
    let engine = TableEngine::new(MemoryStore::new(), EngineConfig::default());
    engine.create_namespace("bench").unwrap();
    engine
        .create_table(
            "bench.rows",
            &["id:integer:hash".to_string(), "score:integer:none".to_string()],
        )
        .unwrap();
    for i in 0..ROWS {
        engine
            .insert(
                "bench.rows",
                &[format!("id={i}"), format!("score={}", i % 100)],
            )
            .unwrap();
    }
    engine
}

fn bench_queries(c: &mut Criterion) {
    let engine = populated_engine();

    let mut group = c.benchmark_group("select_10k_rows");

    group.bench_function("indexed_equality", |b| {
        let cond = vec!["id=5000".to_string()];
        b.iter(|| black_box(engine.select("bench.rows", &cond).unwrap()))
    });

    group.bench_function("scan_filter", |b| {
        let cond = vec!["score>97".to_string()];
        b.iter(|| black_box(engine.select("bench.rows", &cond).unwrap()))
    });

    group.bench_function("indexed_seed_then_filter", |b| {
        let cond = vec!["id=5000".to_string(), "AND".to_string(), "score>=0".to_string()];
        b.iter(|| black_box(engine.select("bench.rows", &cond).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
