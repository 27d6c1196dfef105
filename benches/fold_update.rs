use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use paper_fold::geometry::{edges_geometry, plane_geometry, Geometry, DEFAULT_THRESHOLD_ANGLE};
use paper_fold::scenes::apply_shape;
use paper_fold::{FoldConfig, FoldPose, FoldShape};

/// Sheet and outline prepared the way the studio builds them
fn rest_sheet(width_segments: u32, height_segments: u32) -> (Geometry, Geometry) {
    let mut plane = plane_geometry(11.0, 8.0, width_segments, height_segments);
    plane.rotate_x(-FRAC_PI_2);
    plane.center();
    plane.snapshot_rest();

    let mut outline = edges_geometry(&plane, DEFAULT_THRESHOLD_ANGLE);
    outline.snapshot_rest();
    (plane, outline)
}

/// Benchmark: Single vertex displacement in each regime
fn bench_displace_vertex(c: &mut Criterion) {
    let config = FoldConfig::default();
    let mut group = c.benchmark_group("displace_vertex");

    for (name, target) in [("curling", 5.0f32), ("rolling", 2.0), ("folding", -3.0)] {
        let shape = FoldShape::from_pose(FoldPose::new(target, 0.4), &config);
        let point = Vec3::new(3.0, 0.0, 1.0);
        group.bench_function(name, |b| b.iter(|| black_box(shape.displace(black_box(point)))));
    }

    group.finish();
}

/// Benchmark: One full frame callback at several sheet resolutions
fn bench_frame_update(c: &mut Criterion) {
    let config = FoldConfig::default();
    let mut group = c.benchmark_group("frame_update");

    for (width, height) in [(55u32, 40u32), (110, 80), (220, 160)] {
        let (mut plane, mut outline) = rest_sheet(width, height);
        let mut timestamp = 0.0f64;

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &(width, height),
            |b, _| {
                b.iter(|| {
                    // Step through the whole cycle so every regime is hit
                    timestamp += 16.0;
                    let shape = FoldShape::at(timestamp, &config);
                    apply_shape(&shape, &mut plane);
                    apply_shape(&shape, &mut outline);
                    black_box(plane.version())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_displace_vertex, bench_frame_update);
criterion_main!(benches);
