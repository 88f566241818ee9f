//! Benchmarks for companion-matrix verification and its collaborators.
//!
//! Covers exact versus high-precision traces, irreducibility testing, the
//! lattice-reduction finder, and the full classifier.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hermite::analyzer::is_irreducible;
use hermite::companion::CompanionMatrix;
use hermite::finder::{LatticeFinder, MinimalPolynomialFinder};
use hermite::{classify, verify_cubic, HermiteConfig, Polynomial, Precision, Real};
use num_rational::BigRational;

fn poly(c: &[i64]) -> Option<Polynomial> {
    Polynomial::from_integers(c.iter().copied()).ok()
}

// ============================================================================
// Benchmark: traces
// ============================================================================

fn bench_traces(c: &mut Criterion) {
    let mut group = c.benchmark_group("companion_traces");
    let Some(cubic) = poly(&[1, -3, 3, -3]) else {
        return;
    };

    if let Some(exact) = CompanionMatrix::<BigRational>::new(&cubic, ()) {
        group.bench_function("exact", |b| b.iter(|| black_box(exact.traces(5))));
    }
    for digits in [50u32, 100, 500] {
        let Ok(precision) = Precision::new(digits) else {
            continue;
        };
        if let Some(real) = CompanionMatrix::<Real>::new(&cubic, precision) {
            group.bench_function(BenchmarkId::new("real", digits), |b| {
                b.iter(|| black_box(real.traces(5)));
            });
        }
    }

    group.finish();
}

// ============================================================================
// Benchmark: irreducibility
// ============================================================================

fn bench_irreducibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("irreducibility");

    let cases: [(&str, &[i64]); 4] = [
        ("x3_minus_2", &[1, 0, 0, -2]),
        ("x3_minus_1", &[1, 0, 0, -1]),
        ("x4_plus_4", &[1, 0, 0, 0, 4]),
        ("x5_minus_2x_plus_7", &[1, 0, 0, 0, -2, 7]),
    ];
    for (name, coefficients) in cases {
        if let Some(p) = poly(coefficients) {
            group.bench_with_input(BenchmarkId::from_parameter(name), &p, |b, p| {
                b.iter(|| black_box(is_irreducible(black_box(p))));
            });
        }
    }

    group.finish();
}

// ============================================================================
// Benchmark: finder, verifier and classifier
// ============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let config = HermiteConfig::default();
    let p = Precision::DEFAULT;
    let cbrt2 = Real::from_integer(2, p).cbrt();
    let Ok(tolerance) = config.tolerance_at(p) else {
        return;
    };

    let finder = LatticeFinder::default();
    group.bench_function("find_minimal_polynomial", |b| {
        b.iter(|| black_box(finder.find_minimal_polynomial(&cbrt2, 4, &tolerance)));
    });

    if let Some(cubic) = poly(&[1, 0, 0, -2]) {
        group.bench_function("verify_cubic_supplied", |b| {
            b.iter(|| black_box(verify_cubic(&cbrt2, Some(&cubic), &config)));
        });
    }

    group.bench_function("classify_cbrt2", |b| {
        b.iter(|| black_box(classify(&cbrt2, &config)));
    });

    group.finish();
}

criterion_group!(benches, bench_traces, bench_irreducibility, bench_pipeline);
criterion_main!(benches);
