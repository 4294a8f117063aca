//! Benchmarks for triangulation operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trellis::geometry::angular_sort;
use trellis::prelude::*;

fn random_points(n: usize, seed: u64) -> Vec<Point2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point2::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    let points = random_points(500, 1);
    let sorted = angular_sort(&points);

    c.bench_function("build_and_clip_500", |b| {
        b.iter(|| {
            let mut mesh: HalfEdgeMesh = build_from_loop(&sorted).unwrap();
            triangulate_interior(&mut mesh).unwrap();
            triangulate_exterior(&mut mesh).unwrap();
            mesh
        })
    });

    c.bench_function("delaunay_500", |b| {
        b.iter(|| Triangulation::<u32>::from_points(&points, &TriangulationOptions::default()).unwrap())
    });
}

fn bench_legalize(c: &mut Criterion) {
    let sorted = angular_sort(&random_points(500, 2));
    let mut clipped: HalfEdgeMesh = build_from_loop(&sorted).unwrap();
    triangulate_interior(&mut clipped).unwrap();
    triangulate_exterior(&mut clipped).unwrap();

    c.bench_function("legalize_500", |b| {
        b.iter_batched(
            || clipped.clone(),
            |mut mesh| legalize(&mut mesh, &LegalizeOptions::default()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_constraints(c: &mut Criterion) {
    let mut points = random_points(300, 3);
    let polygon: Vec<Point2<f64>> = (0..12)
        .map(|i| {
            let t = i as f64 / 12.0 * std::f64::consts::TAU;
            let r = if i % 2 == 0 { 0.45 } else { 0.2 };
            Point2::new(0.5 + r * t.cos(), 0.5 + r * t.sin())
        })
        .collect();
    points.extend_from_slice(&polygon);

    c.bench_function("polygon_300", |b| {
        b.iter(|| Triangulation::<u32>::with_polygon(&points, &polygon, &TriangulationOptions::default()).unwrap())
    });
}

fn bench_traversal(c: &mut Criterion) {
    let tri: Triangulation = Triangulation::from_points(&random_points(1000, 4), &TriangulationOptions::default()).unwrap();
    let mesh = tri.mesh();

    c.bench_function("vertex_neighbors_1000", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += mesh.vertex_neighbors(v).count();
            }
            count
        })
    });
}

criterion_group!(benches, bench_construction, bench_legalize, bench_constraints, bench_traversal);
criterion_main!(benches);
