//! Extreme parameter tests for all ballista effects.
//!
//! Verifies that every effect produces finite output when its controls sit at
//! their minimum or maximum values, and when running at extreme sample rates
//! (8 kHz and 192 kHz).

use ballista_core::{ParamStore, ProcessSpec, Processor, StereoBlock};
use ballista_registry::EffectRegistry;

const DEFAULT_SAMPLE_RATE: f64 = 48000.0;
const LOW_SAMPLE_RATE: f64 = 8000.0;
const HIGH_SAMPLE_RATE: f64 = 192000.0;
const BLOCK: usize = 100;
const NUM_BLOCKS: usize = 10;

/// Process `NUM_BLOCKS` of a ±0.5 pattern and assert all outputs are finite.
fn assert_finite_output(effect: &mut dyn Processor, store: &ParamStore, label: &str) {
    for block in 0..NUM_BLOCKS {
        let mut left: [f32; BLOCK] = core::array::from_fn(|i| match i % 3 {
            0 => 0.5,
            1 => -0.5,
            _ => 0.0,
        });
        let mut right = left;
        effect.process(store, StereoBlock::new(&mut left, &mut right));

        for (i, x) in left.iter().chain(right.iter()).enumerate() {
            assert!(
                x.is_finite(),
                "{}: non-finite output in block {} at {}: {}",
                label,
                block,
                i,
                x
            );
        }
    }
    for m in effect.meters() {
        assert!(m.is_finite(), "{}: non-finite meter {}", label, m);
    }
}

fn run_extreme_test(registry: &EffectRegistry, id: &str) {
    let create = |sample_rate: f64| {
        let mut effect = registry.create(id).unwrap();
        effect.prepare(ProcessSpec::stereo(sample_rate, BLOCK));
        let store = ParamStore::new(effect.params());
        (effect, store)
    };

    // All params at minimum
    {
        let (mut effect, store) = create(DEFAULT_SAMPLE_RATE);
        for desc in store.descriptors() {
            store.set(desc.name, desc.min);
        }
        assert_finite_output(effect.as_mut(), &store, &format!("{} (all min)", id));
    }

    // All params at maximum
    {
        let (mut effect, store) = create(DEFAULT_SAMPLE_RATE);
        for desc in store.descriptors() {
            store.set(desc.name, desc.max);
        }
        assert_finite_output(effect.as_mut(), &store, &format!("{} (all max)", id));
    }

    // Low sample rate
    {
        let (mut effect, store) = create(LOW_SAMPLE_RATE);
        assert_finite_output(effect.as_mut(), &store, &format!("{} (8 kHz)", id));
    }

    // High sample rate, maximum settings
    {
        let (mut effect, store) = create(HIGH_SAMPLE_RATE);
        for desc in store.descriptors() {
            store.set(desc.name, desc.max);
        }
        assert_finite_output(effect.as_mut(), &store, &format!("{} (192 kHz)", id));
    }
}

#[test]
fn extreme_params_all_effects() {
    let registry = EffectRegistry::new();
    for id in registry.ids() {
        run_extreme_test(&registry, id);
    }
}

#[test]
fn out_of_range_values_are_clamped() {
    let registry = EffectRegistry::new();

    for id in registry.ids() {
        let mut effect = registry.create(id).unwrap();
        effect.prepare(ProcessSpec::stereo(DEFAULT_SAMPLE_RATE, BLOCK));

        // Values far outside every range, fed straight through a slice surface.
        let wild: Vec<(&str, f32)> = effect
            .params()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name, if i % 2 == 0 { 1.0e9 } else { -1.0e9 }))
            .collect();

        let mut left = [0.25_f32; BLOCK];
        let mut right = [0.25_f32; BLOCK];
        effect.process(&wild.as_slice(), StereoBlock::new(&mut left, &mut right));
        assert!(
            left.iter().chain(right.iter()).all(|x| x.is_finite()),
            "{} passed a wild control through unclamped",
            id
        );
    }
}
