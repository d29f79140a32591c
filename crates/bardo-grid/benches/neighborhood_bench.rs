//! Benchmarks for Bardo grid topology
//!
//! Measures performance of:
//! - Neighbor lookups at corners, edges and interior cells
//! - Full-grid neighborhood sweeps
//! - Storage index lookups

use bardo_grid::{GridBounds, GridCoord, Neighbors};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark neighbor computation
fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");
    let bounds = GridBounds::square(64);

    let coords = [
        ("corner", GridCoord::ORIGIN),
        ("edge", GridCoord::new(32, 0)),
        ("interior", GridCoord::new(32, 32)),
    ];

    for (name, coord) in coords {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &coord, |b, &c| {
            b.iter(|| Neighbors::of(black_box(c), bounds).count())
        });
    }
    group.finish();
}

/// Benchmark a neighborhood sweep over a whole grid
fn bench_grid_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_sweep");

    for &dimension in &[16usize, 64, 128] {
        let bounds = GridBounds::square(dimension);
        group.throughput(Throughput::Elements(bounds.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(dimension),
            &bounds,
            |b, &bounds| {
                b.iter(|| {
                    bounds
                        .coords()
                        .map(|coord| {
                            Neighbors::of(coord, bounds)
                                .filter(|n| (n.x + n.y) % 3 == 0)
                                .count()
                        })
                        .sum::<usize>()
                })
            },
        );
    }
    group.finish();
}

/// Benchmark coordinate to storage index conversion
fn bench_index_of(c: &mut Criterion) {
    let bounds = GridBounds::square(128);
    c.bench_function("index_of", |b| {
        b.iter(|| bounds.index_of(black_box(GridCoord::new(70, 40))))
    });
}

criterion_group!(benches, bench_neighbors, bench_grid_sweep, bench_index_of);

criterion_main!(benches);
