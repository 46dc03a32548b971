//! Criterion benchmarks for ballista effects
//!
//! Run with: cargo bench -p ballista-effects
#![allow(missing_docs)]

use ballista_core::{ParamStore, ProcessSpec, Processor, StereoBlock};
use ballista_registry::EffectRegistry;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

/// Every registered effect at a representative setting.
fn bench_effect(c: &mut Criterion, id: &str, settings: &[(&str, f32)]) {
    let registry = EffectRegistry::new();
    let mut group = c.benchmark_group(id);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &block_size| {
                let Some(mut effect) = registry.create(id) else {
                    return;
                };
                effect.prepare(ProcessSpec::stereo(SAMPLE_RATE, block_size));
                let store = ParamStore::new(effect.params());
                for &(name, value) in settings {
                    store.set(name, value);
                }

                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    effect.process(&store, StereoBlock::new(&mut left, &mut right));
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_dynamics(c: &mut Criterion) {
    bench_effect(c, "compressor", &[("threshold", -24.0), ("knee", 6.0)]);
    bench_effect(c, "gate", &[("threshold", -30.0), ("hold", 20.0)]);
    bench_effect(c, "limiter", &[("threshold", -12.0)]);
    bench_effect(c, "clipper", &[("threshold", -12.0)]);
    bench_effect(c, "deesser", &[("threshold", -40.0)]);
    bench_effect(c, "multiband", &[("b2_threshold", -30.0)]);
}

fn bench_filters(c: &mut Criterion) {
    bench_effect(
        c,
        "equalizer",
        &[("hpf", 1.0), ("hpf_slope", 2.0), ("lpf", 1.0), ("low_mid_gain", 6.0)],
    );
    bench_effect(c, "tilt_eq", &[("tilt", 6.0)]);
    bench_effect(c, "gain", &[("width", 150.0), ("pan", 30.0)]);
}

fn bench_colour_and_time(c: &mut Criterion) {
    bench_effect(c, "distortion", &[("drive", 24.0), ("shape", 1.0)]);
    bench_effect(
        c,
        "delay",
        &[("filter", 1.0), ("drive", 30.0), ("mod_depth", 50.0)],
    );
    bench_effect(c, "reverb", &[("size", 80.0)]);
}

criterion_group!(benches, bench_dynamics, bench_filters, bench_colour_and_time);

criterion_main!(benches);
