//! Property-based tests for ballista-core DSP primitives.
//!
//! Filter stability, envelope bounds, crossover ordering under arbitrary edit
//! sequences, and ring-buffer integrity across block sizes.

use ballista_core::{
    Ballistics, Crossover, CrossoverFrequencies, DelayBuffer, EnvelopeFollower, FilterDesign,
    FilterPipeline, HoldEnvelope, StereoEnvelope, StereoLink, validate_crossovers,
};
use proptest::prelude::*;

const SR: f64 = 48000.0;

fn design(variant: usize, freq: f32, q: f32, gain_db: f32) -> FilterDesign {
    match variant % 5 {
        0 => FilterDesign::Lowpass { freq, q },
        1 => FilterDesign::Highpass { freq, q },
        2 => FilterDesign::Peak { freq, q, gain_db },
        3 => FilterDesign::LowShelf { freq, q, gain_db },
        _ => FilterDesign::HighShelf { freq, q, gain_db },
    }
}

fn crossover_edit() -> impl Strategy<Value = (Crossover, f32)> {
    (
        prop_oneof![
            Just(Crossover::Low),
            Just(Crossover::Mid),
            Just(Crossover::High)
        ],
        1.0f32..30000.0f32,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every filter design stays finite for bounded input, at any frequency
    /// (including past Nyquist, which is clamped) and any Q.
    #[test]
    fn filter_stability(
        freq in 1.0f32..40000.0f32,
        q in 0.0f32..20.0f32,
        gain_db in -24.0f32..24.0f32,
        variant in 0usize..5,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut pipeline: FilterPipeline<2> = FilterPipeline::new();
        pipeline.set_designs([design(variant, freq, q, gain_db), design(variant, freq, q, gain_db)], SR);

        for _ in 0..32 {
            for &x in &input {
                let y = pipeline.process(0, x);
                prop_assert!(y.is_finite(), "variant {} freq {} q {} -> {}", variant, freq, q, y);
            }
        }
    }

    /// The follower never leaves the range spanned by its start and inputs.
    #[test]
    fn envelope_bounded(
        attack in 0.0f32..200.0f32,
        release in 0.0f32..2000.0f32,
        input in prop::collection::vec(0.0f32..=4.0f32, 1..512),
    ) {
        let b = Ballistics::from_times_ms(attack, release, SR);
        let mut env = EnvelopeFollower::new();
        let peak = input.iter().copied().fold(0.0f32, f32::max);
        for &x in &input {
            let level = env.process(x, &b);
            prop_assert!(level >= 0.0 && level <= peak * (1.0 + 1e-6));
        }
    }

    /// Linked detection writes the same level to both channels.
    #[test]
    fn linked_envelope_is_shared(
        input in prop::collection::vec((-1.0f32..=1.0f32, -1.0f32..=1.0f32), 1..256),
    ) {
        let b = Ballistics::from_times_ms(1.0, 50.0, SR);
        let mut env = StereoEnvelope::new();
        for &(l, r) in &input {
            let [a, c] = env.process(l, r, StereoLink::Linked, &b);
            prop_assert_eq!(a, c);
        }
    }

    /// The gate state stays within [0, 1] for any target sequence.
    #[test]
    fn hold_envelope_bounded(
        hold in 0u32..200,
        targets in prop::collection::vec(0.0f32..=1.0f32, 1..512),
    ) {
        let b = Ballistics::from_times_ms(0.5, 20.0, SR);
        let mut gate = HoldEnvelope::new();
        for &t in &targets {
            let s = gate.process(t, &b, hold);
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }

    /// After every edit in any sequence the ordering invariant holds.
    #[test]
    fn crossover_ordering_invariant(
        edits in prop::collection::vec(crossover_edit(), 1..64),
    ) {
        let mut f = CrossoverFrequencies::DEFAULT;
        for (which, value) in edits {
            let mut candidate = f;
            match which {
                Crossover::Low => candidate.low = value,
                Crossover::Mid => candidate.mid = value,
                Crossover::High => candidate.high = value,
            }
            f = validate_crossovers(candidate, which);
            prop_assert!(f.is_valid(), "{:?} after {:?} = {}", f, which, value);
        }
    }

    /// A valid edit is accepted exactly.
    #[test]
    fn valid_edit_is_unchanged(low in 20.0f32..700.0f32) {
        let candidate = CrossoverFrequencies { low, mid: 1000.0, high: 6000.0 };
        prop_assert_eq!(validate_crossovers(candidate, Crossover::Low), candidate);
    }

    /// `sanitized` always produces a valid set and keeps a usable mid.
    #[test]
    fn sanitized_is_valid(
        low in prop::num::f32::ANY,
        mid in 1.0f32..20000.0f32,
        high in prop::num::f32::ANY,
    ) {
        let f = CrossoverFrequencies { low, mid, high }.sanitized();
        prop_assert!(f.is_valid());
        prop_assert_eq!(f.mid, mid);
    }

    /// An impulse comes back after exactly `delay` samples whatever the
    /// block size.
    #[test]
    fn ring_impulse_any_block_size(delay in 1usize..400, block in 1usize..128) {
        let mut ring = DelayBuffer::new();
        ring.allocate(DelayBuffer::capacity_for(400, 128));
        let total = delay + block + 1;
        let mut input = vec![0.0f32; total];
        input[0] = 1.0;
        let mut output = vec![0.0f32; total];

        for (src, dst) in input.chunks(block).zip(output.chunks_mut(block)) {
            ring.write_block(0, src);
            ring.read_block(0, delay, dst);
            ring.advance(src.len());
        }

        for (n, &y) in output.iter().enumerate() {
            let expected = if n == delay { 1.0 } else { 0.0 };
            prop_assert_eq!(y, expected, "sample {}", n);
        }
    }
}
