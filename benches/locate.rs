//! Performance benchmarks for index construction and query location.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use fmlocate::index::{BoundaryMap, SuffixArrayIndex, TextIndex, RECORD_TERMINATOR};

/// Deterministic four-letter reference: `records` lines of `record_len`
/// bytes each. A fixed-seed LCG keeps runs comparable without extra deps.
fn synthetic_reference(records: usize, record_len: usize) -> Vec<u8> {
    let mut text = Vec::with_capacity(records * (record_len + 1));
    let mut state: u64 = 42;

    for _ in 0..records {
        for _ in 0..record_len {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            text.push(b"ACGT"[(state >> 33) as usize % 4]);
        }
        text.push(b'\n');
    }

    text
}

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");

    for (label, records) in [("64kb", 1_024), ("1mb", 16_384)] {
        let text = synthetic_reference(records, 64);
        group.bench_function(label, |b| {
            b.iter_batched(
                || text.clone(),
                |text| SuffixArrayIndex::construct(black_box(text)),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let text = synthetic_reference(16_384, 64);
    let index = SuffixArrayIndex::construct(text.clone());

    let mut group = c.benchmark_group("locate");

    for (label, len) in [("4b", 4), ("16b", 16), ("64b", 64)] {
        let pattern = &text[5..5 + len];
        group.bench_function(label, |b| {
            b.iter(|| index.locate(black_box(pattern)))
        });
    }

    group.finish();
}

fn bench_record_at(c: &mut Criterion) {
    let text = synthetic_reference(16_384, 64);
    let index = SuffixArrayIndex::construct(text);
    let map = BoundaryMap::from_terminators(index.locate(&[RECORD_TERMINATOR]));

    let offsets: Vec<u64> = (0..64).map(|i| i * 16_381).collect();

    c.bench_function("record_at", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(map.record_at(black_box(offset)));
            }
        })
    });
}

criterion_group!(benches, bench_construct, bench_locate, bench_record_at);
criterion_main!(benches);
