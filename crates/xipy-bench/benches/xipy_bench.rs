//! Benchmarks for xipy-rs operations.
//!
//! Run with: `cargo bench` (add `--features parallel` for the rayon paths)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use xipy_core::Volume;
use xipy_lut::{Alpha, ColormapRegistry, lut_indices};
use xipy_math::Vec3;
use xipy_ops::filter::gaussian_filter_3d;
use xipy_ops::{Blender, ChannelRole, MaskOptions, ThresholdStrategy};
use xipy_scene::{phantom, three_plane_point};

/// Value-to-row resolution and row lookup.
fn bench_lut(c: &mut Criterion) {
    let mut group = c.benchmark_group("lut");
    let reg = ColormapRegistry::builtin(256).unwrap();
    let hot = reg.get("hot").unwrap();

    for size in [1000usize, 10000, 100000].iter() {
        let values: Vec<f32> = (0..*size).map(|i| i as f32 / *size as f32 * 1.2 - 0.1).collect();
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("indices", size), &values, |b, v| {
            b.iter(|| lut_indices(black_box(v), None, 256).unwrap())
        });

        let rows = lut_indices(&values, None, 256).unwrap();
        group.bench_with_input(BenchmarkId::new("lookup_uniform", size), &rows, |b, r| {
            b.iter(|| hot.lookup_all(black_box(r), &Alpha::Uniform(0.5)).unwrap())
        });

        let curve = Alpha::Curve((0..256).map(|i| i as f32 / 255.0).collect());
        group.bench_with_input(BenchmarkId::new("lookup_curve", size), &rows, |b, r| {
            b.iter(|| hot.lookup_all_bytes(black_box(r), &curve).unwrap())
        });
    }

    group.finish();
}

/// Colormap sampling at different table sizes.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [256usize, 4096].iter() {
        group.bench_with_input(BenchmarkId::new("builtin_registry", n), n, |b, &n| {
            b.iter(|| ColormapRegistry::builtin(black_box(n)).unwrap())
        });
    }
    group.finish();
}

fn two_channel_blender(size: usize) -> Blender {
    let reg = ColormapRegistry::builtin(256).unwrap();
    let shape = [size; 3];
    let mut blender = Blender::new();
    blender
        .set_channel(
            ChannelRole::Main,
            phantom::head(shape).unwrap(),
            reg.get("gray").unwrap().clone(),
            Alpha::OPAQUE,
        )
        .unwrap();
    let c = size as f64 / 2.0;
    blender
        .set_channel(
            ChannelRole::Overlay,
            phantom::activation(shape, [c, c, c], size as f64 / 8.0, 4.0).unwrap(),
            reg.get("hot").unwrap().clone(),
            0.6f32,
        )
        .unwrap();
    blender
}

/// Full recomposite after an alpha change.
fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    group.sample_size(20);

    for size in [32usize, 64].iter() {
        let mut blender = two_channel_blender(*size);
        let voxels = size * size * size;
        group.throughput(Throughput::Elements(voxels as u64));

        let mut flip = false;
        group.bench_function(BenchmarkId::new("rebuild", size), |b| {
            b.iter(|| {
                flip = !flip;
                let a = if flip { 0.6f32 } else { 0.7 };
                blender.set_alpha(ChannelRole::Overlay, a).unwrap();
                black_box(blender.composite().unwrap().len())
            })
        });

        group.bench_function(BenchmarkId::new("cached", size), |b| {
            b.iter(|| black_box(blender.composite().unwrap().len()))
        });
    }

    group.finish();
}

/// Gaussian smoothing and the full surface mask.
fn bench_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask");
    group.sample_size(10);

    let vol: Volume<f32> = phantom::head([32, 32, 32]).unwrap();
    for sigma in [1.0f32, 2.0, 6.0].iter() {
        group.bench_with_input(BenchmarkId::new("gaussian_3d", sigma), sigma, |b, &s| {
            b.iter(|| gaussian_filter_3d(black_box(&vol), s).unwrap())
        });
    }

    let strategy = ThresholdStrategy::default();
    let opts = MaskOptions::default();
    group.bench_function("surface_mask_32", |b| {
        b.iter(|| {
            // Fresh blender each time so the cache never hits.
            let mut blender = two_channel_blender(32);
            black_box(blender.derive_surface_mask(&strategy, &opts).unwrap().len())
        })
    });

    group.finish();
}

/// Plane intersection.
fn bench_planes(c: &mut Criterion) {
    let n1 = Vec3::new(1.0, 0.1, 0.0).normalize();
    let n2 = Vec3::new(0.0, 1.0, 0.2).normalize();
    let n3 = Vec3::new(0.1, 0.0, 1.0).normalize();
    let p = Vec3::new(3.0, -2.0, 7.0);

    c.bench_function("three_plane_point", |b| {
        b.iter(|| three_plane_point(black_box(n1), black_box(n2), black_box(n3), p, p, p).unwrap())
    });
}

criterion_group!(
    benches,
    bench_lut,
    bench_build,
    bench_composite,
    bench_mask,
    bench_planes,
);

criterion_main!(benches);
