//! Criterion microbenches for panomark parsing, writing and analysis.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - panorama CSV parsing (from_pano_csv_str)
//! - panorama CSV writing (to_pano_csv_string)
//! - projection plus all-pairs overlap detection (scene::analyze)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use panomark::ir::io_pano_csv::{from_pano_csv_str, to_pano_csv_string};
use panomark::ir::{Document, Header, Record};
use panomark::scene::analyze;

// Include test fixtures at compile time (no file I/O during benchmark)
const PANO_FIXTURE: &str = include_str!("../tests/fixtures/sample_valid.pano.csv");

/// A deterministic table of `n` boxes spread over the panorama, some of them
/// overlapping and some crossing the seam.
fn synthetic_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let x1 = ((i * 97) % 3700) as i32;
            let y1 = ((i * 31) % 400) as i32;
            let azimuth = ((i % 7) as f64 - 3.0) * 15.0;
            Record::new(x1, y1, x1 + 40 + (i % 60) as i32, y1 + 20 + (i % 80) as i32)
                .with_offset(azimuth, ((i % 5) as f64 - 2.0) * 1.5)
        })
        .collect()
}

/// Benchmark panorama CSV parsing from string.
fn bench_pano_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pano_parse");
    group.throughput(Throughput::Bytes(PANO_FIXTURE.len() as u64));

    group.bench_function("from_pano_csv_str", |b| {
        b.iter(|| {
            let doc = from_pano_csv_str(black_box(PANO_FIXTURE)).unwrap();
            black_box(doc)
        })
    });

    group.finish();
}

/// Benchmark panorama CSV writing, strict validation included.
fn bench_pano_write(c: &mut Criterion) {
    let document = Document::new(Header::default(), synthetic_records(500));

    let mut group = c.benchmark_group("pano_write");
    group.throughput(Throughput::Elements(document.records.len() as u64));

    group.bench_function("to_pano_csv_string", |b| {
        b.iter(|| {
            let text = to_pano_csv_string(black_box(&document)).unwrap();
            black_box(text)
        })
    });

    group.finish();
}

/// Benchmark the full analysis pipeline. Overlap detection is quadratic, so
/// track a few table sizes.
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for n in [10usize, 100, 500] {
        let records = synthetic_records(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| black_box(analyze(black_box(records))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pano_parse, bench_pano_write, bench_analyze);
criterion_main!(benches);
