//! Benchmarks for the projective-triple iteration.
//!
//! Measures a single step, a full run to a confirmed period, and how the
//! run scales with the working precision.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hermite::hapd::{ProjectiveTriple, ProjectiveTripleIterator};
use hermite::{HermiteConfig, Precision, Real};

fn cbrt2(precision: Precision) -> Real {
    Real::from_integer(2, precision).cbrt()
}

// ============================================================================
// Benchmark: single step
// ============================================================================

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("hapd_step");
    group.throughput(Throughput::Elements(1));

    for digits in [50u32, 100, 400] {
        let config = HermiteConfig::default().with_precision(digits);
        let Ok(iterator) = ProjectiveTripleIterator::new(&config) else {
            continue;
        };
        let triple = ProjectiveTriple::initial(&cbrt2(iterator.precision()));
        group.bench_with_input(BenchmarkId::from_parameter(digits), &triple, |b, t| {
            b.iter(|| black_box(iterator.step(black_box(t))));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: full runs
// ============================================================================

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("hapd_run");
    let config = HermiteConfig::default();
    let Ok(iterator) = ProjectiveTripleIterator::new(&config) else {
        return;
    };
    let p = iterator.precision();

    let inputs = [
        ("cbrt2", cbrt2(p)),
        ("cbrt3", Real::from_integer(3, p).cbrt()),
        ("sqrt2", Real::from_integer(2, p).sqrt().unwrap_or_else(|| Real::one(p))),
        ("pi", Real::pi(p)),
        ("rational_355_113", Real::from_ratio(355, 113, p).unwrap_or_else(|| Real::one(p))),
    ];
    for (name, value) in &inputs {
        group.bench_with_input(BenchmarkId::new("default", name), value, |b, v| {
            b.iter(|| black_box(iterator.run(black_box(v))));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: precision scaling
// ============================================================================

fn bench_precision_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("hapd_precision");
    group.sample_size(20);

    for digits in [32u32, 100, 250, 500] {
        let config = HermiteConfig::default().with_precision(digits);
        let Ok(iterator) = ProjectiveTripleIterator::new(&config) else {
            continue;
        };
        let value = cbrt2(iterator.precision());
        group.bench_with_input(BenchmarkId::new("cbrt2", digits), &value, |b, v| {
            b.iter(|| black_box(iterator.run(black_box(v))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_run, bench_precision_scaling);
criterion_main!(benches);
