//! Benchmarks for curve interning and bone sampling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use motion_core::{BezierCurveCache, BoneKeyframe, Motion};

fn bench_curve_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve_cache");

    // Hot path: every evaluation hits one interned curve.
    group.bench_function("interned_evaluate", |b| {
        let mut cache = BezierCurveCache::new();
        cache.evaluate([100, 0, 107, 107], 30, 0.5);
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 0.013) % 1.0;
            black_box(cache.evaluate([100, 0, 107, 107], 30, t));
        });
    });

    group.bench_function("cold_construct", |b| {
        b.iter(|| {
            let mut cache = BezierCurveCache::new();
            black_box(cache.evaluate([100, 0, 107, 107], 30, 0.5));
        });
    });

    group.finish();
}

fn bench_bone_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("bone_sampling");

    for keyframes in [16u32, 256, 1024] {
        let mut motion = Motion::new(0);
        for i in 0..keyframes {
            let mut keyframe = BoneKeyframe::new("arm", i * 10);
            keyframe.translation = [i as f32, 0.0, 0.0];
            keyframe.interpolation.translation_x = [100, 0, 107, 107];
            motion.add_bone_keyframe(keyframe).unwrap();
        }
        let span = (keyframes - 1) * 10;
        group.bench_with_input(
            BenchmarkId::from_parameter(keyframes),
            &span,
            |b, &span| {
                let mut frame = 0u32;
                b.iter(|| {
                    frame = (frame + 7) % span.max(1);
                    black_box(motion.sample_bone("arm", frame));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_curve_cache, bench_bone_sampling);
criterion_main!(benches);
