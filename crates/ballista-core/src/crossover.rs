//! Linkwitz-Riley crossovers and crossover-frequency validation.
//!
//! An LR4 split cascades two identical Butterworth (Q = 1/√2) sections per
//! output. The lowpass and highpass outputs sum to a second-order allpass at
//! the crossover frequency, so recombined bands are magnitude-flat. A
//! multiband router keeps sibling branches phase aligned by passing each one
//! through the allpass of the split it did not take (see [`LrAllpass`]).
//!
//! Crossover frequencies are validated by a pure function,
//! [`validate_crossovers`]. Writing the corrected values back to a parameter
//! store is the host's job.

use crate::biquad::{BiquadCoefficients, BiquadState};
use crate::filter::BUTTERWORTH_Q;
use crate::math::{above, below};

/// Highest allowed `low / mid` ratio (exclusive).
pub const LOW_MID_RATIO: f32 = 0.8;
/// Lowest allowed `high / mid` ratio (exclusive).
pub const HIGH_MID_RATIO: f32 = 1.25;

/// Candidates outside `[1 Hz, 1 MHz]` fall back to the defaults.
const MAX_CANDIDATE_HZ: f32 = 1.0e6;

/// Frequency clamp for the split filters, as a fraction of the sample rate.
const MAX_SPLIT_RATIO: f64 = 0.49;

fn split_frequency(freq: f32, sample_rate: f64) -> f64 {
    f64::from(freq).clamp(1.0, (sample_rate * MAX_SPLIT_RATIO).max(1.0))
}

/// Stereo fourth-order Linkwitz-Riley band split.
#[derive(Debug, Clone, Copy)]
pub struct LinkwitzRiley {
    lowpass: BiquadCoefficients,
    highpass: BiquadCoefficients,
    // [channel][section]
    low_states: [[BiquadState; 2]; 2],
    high_states: [[BiquadState; 2]; 2],
}

impl LinkwitzRiley {
    /// A split at `freq` Hz.
    pub fn new(freq: f32, sample_rate: f64) -> Self {
        let mut lr = Self {
            lowpass: BiquadCoefficients::IDENTITY,
            highpass: BiquadCoefficients::IDENTITY,
            low_states: [[BiquadState::new(); 2]; 2],
            high_states: [[BiquadState::new(); 2]; 2],
        };
        lr.set_frequency(freq, sample_rate);
        lr
    }

    /// Move the split point. State is kept.
    pub fn set_frequency(&mut self, freq: f32, sample_rate: f64) {
        let f = split_frequency(freq, sample_rate);
        let q = f64::from(BUTTERWORTH_Q);
        self.lowpass = BiquadCoefficients::lowpass(f, q, sample_rate);
        self.highpass = BiquadCoefficients::highpass(f, q, sample_rate);
    }

    /// Split one sample on `channel` into `(low, high)`.
    #[inline]
    pub fn split(&mut self, channel: usize, input: f32) -> (f32, f32) {
        let [l1, l2] = &mut self.low_states[channel];
        let low = l2.process(&self.lowpass, l1.process(&self.lowpass, input));
        let [h1, h2] = &mut self.high_states[channel];
        let high = h2.process(&self.highpass, h1.process(&self.highpass, input));
        (low, high)
    }

    /// Clear all state.
    pub fn reset(&mut self) {
        for ch in self.low_states.iter_mut().chain(self.high_states.iter_mut()) {
            for s in ch {
                s.clear();
            }
        }
    }
}

/// Stereo allpass matching the phase of an LR4 split at the same frequency.
#[derive(Debug, Clone, Copy)]
pub struct LrAllpass {
    coefficients: BiquadCoefficients,
    states: [BiquadState; 2],
}

impl LrAllpass {
    /// An allpass at `freq` Hz.
    pub fn new(freq: f32, sample_rate: f64) -> Self {
        let mut ap = Self {
            coefficients: BiquadCoefficients::IDENTITY,
            states: [BiquadState::new(); 2],
        };
        ap.set_frequency(freq, sample_rate);
        ap
    }

    /// Move the phase point. State is kept.
    pub fn set_frequency(&mut self, freq: f32, sample_rate: f64) {
        self.coefficients = BiquadCoefficients::allpass(
            split_frequency(freq, sample_rate),
            f64::from(BUTTERWORTH_Q),
            sample_rate,
        );
    }

    /// Process one sample on `channel`.
    #[inline]
    pub fn process(&mut self, channel: usize, input: f32) -> f32 {
        self.states[channel].process(&self.coefficients, input)
    }

    /// Clear state.
    pub fn reset(&mut self) {
        for s in &mut self.states {
            s.clear();
        }
    }
}

/// Which crossover a user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    /// Split between bands 1 and 2.
    Low,
    /// Split between bands 2 and 3.
    Mid,
    /// Split between bands 3 and 4.
    High,
}

/// The three split points of a four-band router, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverFrequencies {
    /// Lowest split.
    pub low: f32,
    /// Middle split.
    pub mid: f32,
    /// Highest split.
    pub high: f32,
}

impl CrossoverFrequencies {
    /// Default split points: 120 Hz, 1 kHz, 6 kHz.
    pub const DEFAULT: Self = Self {
        low: 120.0,
        mid: 1000.0,
        high: 6000.0,
    };

    /// `low < mid·0.8` and `high > mid·1.25`, all finite and positive.
    pub fn is_valid(&self) -> bool {
        [self.low, self.mid, self.high]
            .iter()
            .all(|f| f.is_finite() && *f > 0.0)
            && self.low < self.mid * LOW_MID_RATIO
            && self.high > self.mid * HIGH_MID_RATIO
    }

    /// Keep `mid`, move `low` and `high` the least amount needed.
    pub fn sanitized(&self) -> Self {
        let mut f = self.finite_or_default();
        f.fit_around_mid();
        f
    }

    fn finite_or_default(&self) -> Self {
        let pick = |v: f32, d: f32| {
            if (1.0..=MAX_CANDIDATE_HZ).contains(&v) { v } else { d }
        };
        Self {
            low: pick(self.low, Self::DEFAULT.low),
            mid: pick(self.mid, Self::DEFAULT.mid),
            high: pick(self.high, Self::DEFAULT.high),
        }
    }

    fn fit_around_mid(&mut self) {
        let low_limit = self.mid * LOW_MID_RATIO;
        if self.low >= low_limit {
            self.low = below(low_limit);
        }
        let high_limit = self.mid * HIGH_MID_RATIO;
        if self.high <= high_limit {
            self.high = above(high_limit);
        }
    }
}

impl Default for CrossoverFrequencies {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Correct a candidate set of crossover frequencies after an edit.
///
/// The edited value moves to the nearest frequency that satisfies the
/// ordering invariant against the untouched neighbours. When no such value
/// exists (an edited mid squeezed between neighbours that are already too
/// close), the edited mid is kept and the neighbours move instead. A valid
/// candidate is returned unchanged.
///
/// # Example
///
/// ```rust
/// use ballista_core::{validate_crossovers, Crossover, CrossoverFrequencies};
///
/// let edit = CrossoverFrequencies { low: 950.0, mid: 1000.0, high: 6000.0 };
/// let fixed = validate_crossovers(edit, Crossover::Low);
/// assert!(fixed.is_valid());
/// assert!(fixed.low < 800.0 && fixed.low > 799.9);
/// ```
pub fn validate_crossovers(
    candidate: CrossoverFrequencies,
    edited: Crossover,
) -> CrossoverFrequencies {
    let mut f = candidate.finite_or_default();
    if f.is_valid() {
        return f;
    }

    if edited == Crossover::Mid {
        let lower = f.low / LOW_MID_RATIO;
        let upper = f.high / HIGH_MID_RATIO;
        if lower < upper {
            let mut mid = f.mid.clamp(lower, upper);
            // Division and multiplication round differently; step off the
            // boundary by single ulps.
            for _ in 0..8 {
                if f.low < mid * LOW_MID_RATIO {
                    break;
                }
                mid = above(mid);
            }
            for _ in 0..8 {
                if f.high > mid * HIGH_MID_RATIO {
                    break;
                }
                mid = below(mid);
            }
            f.mid = mid;
        }
    }

    // Low or high edits only move the edited value; anything still out of
    // order after a mid edit is fixed around the mid.
    f.fit_around_mid();
    f
}
