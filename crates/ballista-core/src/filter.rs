//! Tagged filter pipelines.
//!
//! Every effect's cascade topology is fixed at construction: an equalizer is
//! always highpass, shelf, two peaks, shelf, lowpass. A [`FilterPipeline`] is
//! that fixed-size, ordered list of [`FilterStage`]s. Each stage carries a
//! [`FilterDesign`] tag describing which formula produces its coefficients,
//! so changing a parameter means swapping a design value, not a filter
//! object, and processing is a plain loop with no dynamic dispatch.
//!
//! Disabled stages use [`FilterDesign::Identity`] instead of being skipped.
//! Their state keeps running, so re-enabling a stage does not start it from
//! a stale history.

use crate::biquad::{BiquadCoefficients, BiquadState};
use core::f64::consts::{FRAC_1_SQRT_2, PI};
use libm::cos;

/// Lowest frequency any design will accept.
const MIN_FREQUENCY: f64 = 1.0;
/// Highest frequency any design will accept, as a fraction of the sample rate.
const MAX_FREQUENCY_RATIO: f64 = 0.49;
/// Lowest Q any design will accept.
const MIN_Q: f64 = 0.01;

/// Which cookbook formula a stage uses, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterDesign {
    /// Passthrough.
    #[default]
    Identity,
    /// Second-order lowpass.
    Lowpass {
        /// Cutoff in Hz.
        freq: f32,
        /// Resonance.
        q: f32,
    },
    /// Second-order highpass.
    Highpass {
        /// Cutoff in Hz.
        freq: f32,
        /// Resonance.
        q: f32,
    },
    /// Peaking bell.
    Peak {
        /// Centre in Hz.
        freq: f32,
        /// Bandwidth control.
        q: f32,
        /// Boost or cut in dB.
        gain_db: f32,
    },
    /// Low shelf.
    LowShelf {
        /// Corner in Hz.
        freq: f32,
        /// Transition steepness.
        q: f32,
        /// Shelf gain in dB.
        gain_db: f32,
    },
    /// High shelf.
    HighShelf {
        /// Corner in Hz.
        freq: f32,
        /// Transition steepness.
        q: f32,
        /// Shelf gain in dB.
        gain_db: f32,
    },
}

impl FilterDesign {
    /// Compute coefficients for this design.
    ///
    /// Frequency is clamped to `[1 Hz, 0.49·fs]` and Q floored at 0.01, so
    /// any control value yields a stable section.
    pub fn coefficients(&self, sample_rate: f64) -> BiquadCoefficients {
        let top = (sample_rate * MAX_FREQUENCY_RATIO).max(MIN_FREQUENCY);
        let freq = |f: f32| f64::from(f).clamp(MIN_FREQUENCY, top);
        let q = |q: f32| f64::from(q).max(MIN_Q);
        match *self {
            Self::Identity => BiquadCoefficients::IDENTITY,
            Self::Lowpass { freq: f, q: r } => BiquadCoefficients::lowpass(freq(f), q(r), sample_rate),
            Self::Highpass { freq: f, q: r } => {
                BiquadCoefficients::highpass(freq(f), q(r), sample_rate)
            }
            Self::Peak { freq: f, q: r, gain_db } => {
                BiquadCoefficients::peak(freq(f), q(r), f64::from(gain_db), sample_rate)
            }
            Self::LowShelf { freq: f, q: r, gain_db } => {
                BiquadCoefficients::low_shelf(freq(f), q(r), f64::from(gain_db), sample_rate)
            }
            Self::HighShelf { freq: f, q: r, gain_db } => {
                BiquadCoefficients::high_shelf(freq(f), q(r), f64::from(gain_db), sample_rate)
            }
        }
    }

    /// `Identity` unless `enabled`.
    pub fn enabled_if(self, enabled: bool) -> Self {
        if enabled { self } else { Self::Identity }
    }
}

/// One biquad section with a design tag and a state per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterStage {
    design: FilterDesign,
    coefficients: BiquadCoefficients,
    states: [BiquadState; 2],
}

impl FilterStage {
    /// A passthrough stage.
    pub const fn new() -> Self {
        Self {
            design: FilterDesign::Identity,
            coefficients: BiquadCoefficients::IDENTITY,
            states: [BiquadState::new(); 2],
        }
    }

    /// Set the design and recompute coefficients.
    pub fn set_design(&mut self, design: FilterDesign, sample_rate: f64) {
        self.design = design;
        self.coefficients = design.coefficients(sample_rate);
    }

    /// Current design.
    pub fn design(&self) -> FilterDesign {
        self.design
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Filter one sample on `channel` (0 or 1).
    #[inline]
    pub fn process(&mut self, channel: usize, input: f32) -> f32 {
        self.states[channel].process(&self.coefficients, input)
    }

    /// Clear both channel states.
    pub fn reset(&mut self) {
        for s in &mut self.states {
            s.clear();
        }
    }
}

/// A fixed, ordered cascade of `N` stereo biquad stages.
///
/// # Example
///
/// ```rust
/// use ballista_core::{FilterDesign, FilterPipeline};
///
/// let mut tone: FilterPipeline<2> = FilterPipeline::new();
/// tone.set_designs(
///     [
///         FilterDesign::Highpass { freq: 80.0, q: 0.707 },
///         FilterDesign::Lowpass { freq: 12000.0, q: 0.707 },
///     ],
///     48000.0,
/// );
///
/// let mut left = [0.5_f32; 64];
/// let mut right = [0.5_f32; 64];
/// tone.process_block(&mut left, &mut right);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterPipeline<const N: usize> {
    stages: [FilterStage; N],
}

impl<const N: usize> FilterPipeline<N> {
    /// All stages passthrough.
    pub const fn new() -> Self {
        Self {
            stages: [FilterStage::new(); N],
        }
    }

    /// Set the design of stage `index`.
    pub fn set_design(&mut self, index: usize, design: FilterDesign, sample_rate: f64) {
        self.stages[index].set_design(design, sample_rate);
    }

    /// Set every stage in order.
    pub fn set_designs(&mut self, designs: [FilterDesign; N], sample_rate: f64) {
        for (stage, design) in self.stages.iter_mut().zip(designs) {
            stage.set_design(design, sample_rate);
        }
    }

    /// Set a contiguous run of stages starting at `start`.
    pub fn set_range(&mut self, start: usize, designs: &[FilterDesign], sample_rate: f64) {
        for (stage, &design) in self.stages[start..].iter_mut().zip(designs) {
            stage.set_design(design, sample_rate);
        }
    }

    /// Recompute every stage's coefficients from its current design.
    pub fn update(&mut self, sample_rate: f64) {
        for stage in &mut self.stages {
            stage.set_design(stage.design, sample_rate);
        }
    }

    /// Stage access for inspection.
    pub fn stage(&self, index: usize) -> &FilterStage {
        &self.stages[index]
    }

    /// Run one sample on `channel` through every stage.
    #[inline]
    pub fn process(&mut self, channel: usize, input: f32) -> f32 {
        self.stages
            .iter_mut()
            .fold(input, |x, stage| stage.process(channel, x))
    }

    /// Filter a stereo block in place.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        for x in left.iter_mut() {
            *x = self.process(0, *x);
        }
        for x in right.iter_mut() {
            *x = self.process(1, *x);
        }
    }

    /// Combined magnitude response at `frequency`.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.stages
            .iter()
            .map(|s| s.coefficients().magnitude_at(frequency, sample_rate))
            .product()
    }

    /// Clear all state.
    pub fn reset(&mut self) {
        for s in &mut self.stages {
            s.reset();
        }
    }
}

impl<const N: usize> Default for FilterPipeline<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Response family for a Butterworth cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Keep frequencies below the cutoff.
    Lowpass,
    /// Keep frequencies above the cutoff.
    Highpass,
}

/// Butterworth slope in dB/octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButterworthSlope {
    /// Order 2.
    #[default]
    Db12,
    /// Order 4.
    Db24,
    /// Order 6.
    Db36,
}

impl ButterworthSlope {
    /// Map a choice index (0, 1, 2). Anything else picks the nearest.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Db12,
            1 => Self::Db24,
            _ => Self::Db36,
        }
    }

    /// Filter order.
    pub fn order(self) -> usize {
        match self {
            Self::Db12 => 2,
            Self::Db24 => 4,
            Self::Db36 => 6,
        }
    }

    /// Number of biquad sections.
    pub fn sections(self) -> usize {
        self.order() / 2
    }
}

/// Q of section `k` (0-based) in an even-order Butterworth cascade.
///
/// `Q_k = 1 / (2 cos((2k+1)π / (2N)))`.
pub fn butterworth_q(order: usize, k: usize) -> f32 {
    let n = order as f64;
    let angle = (2.0 * k as f64 + 1.0) * PI / (2.0 * n);
    (1.0 / (2.0 * cos(angle))) as f32
}

/// Three stage designs for a Butterworth highpass or lowpass.
///
/// Sections beyond the slope's order are `Identity`, so the same three-stage
/// slot in a pipeline serves every slope.
pub fn butterworth_designs(kind: PassKind, freq: f32, slope: ButterworthSlope) -> [FilterDesign; 3] {
    let order = slope.order();
    let mut designs = [FilterDesign::Identity; 3];
    for (k, d) in designs.iter_mut().enumerate().take(slope.sections()) {
        let q = butterworth_q(order, k);
        *d = match kind {
            PassKind::Lowpass => FilterDesign::Lowpass { freq, q },
            PassKind::Highpass => FilterDesign::Highpass { freq, q },
        };
    }
    designs
}

/// Butterworth Q for a single second-order section.
pub const BUTTERWORTH_Q: f32 = FRAC_1_SQRT_2 as f32;

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    #[test]
    fn test_butterworth_q_values() {
        assert!((butterworth_q(2, 0) - 0.7071).abs() < 1e-4);
        let q4: [f32; 2] = [butterworth_q(4, 0), butterworth_q(4, 1)];
        assert!((q4[0] - 0.5412).abs() < 1e-3 && (q4[1] - 1.3066).abs() < 1e-3);
        let q6: [f32; 3] = [butterworth_q(6, 0), butterworth_q(6, 1), butterworth_q(6, 2)];
        assert!((q6[0] - 0.5176).abs() < 1e-3);
        assert!((q6[1] - 0.7071).abs() < 1e-3);
        assert!((q6[2] - 1.9319).abs() < 1e-3);
    }

    #[test]
    fn test_cascade_is_minus_3db_at_cutoff() {
        for slope in [ButterworthSlope::Db12, ButterworthSlope::Db24, ButterworthSlope::Db36] {
            let mut p: FilterPipeline<3> = FilterPipeline::new();
            p.set_designs(butterworth_designs(PassKind::Highpass, 1000.0, slope), SR);
            let db = 20.0 * libm::log10(p.magnitude_at(1000.0, SR));
            assert!((db + 3.01).abs() < 0.05, "{slope:?}: {db} dB at cutoff");
        }
    }

    #[test]
    fn test_slope_steepens() {
        let atten = |slope| {
            let mut p: FilterPipeline<3> = FilterPipeline::new();
            p.set_designs(butterworth_designs(PassKind::Lowpass, 1000.0, slope), SR);
            20.0 * libm::log10(p.magnitude_at(4000.0, SR))
        };
        let a12 = atten(ButterworthSlope::Db12);
        let a24 = atten(ButterworthSlope::Db24);
        let a36 = atten(ButterworthSlope::Db36);
        assert!(a12 > a24 && a24 > a36, "{a12} {a24} {a36}");
    }

    #[test]
    fn test_identity_stages_pass_through() {
        let mut p: FilterPipeline<4> = FilterPipeline::new();
        let input: [f32; 8] = [0.0, 1.0, -0.5, 0.25, 0.3, -0.9, 0.0, 0.1];
        let mut left = input;
        let mut right = input;
        p.process_block(&mut left, &mut right);
        assert_eq!(left, input);
        assert_eq!(right, input);
    }

    #[test]
    fn test_out_of_range_frequency_is_clamped() {
        let c = FilterDesign::Lowpass { freq: 1.0e6, q: 0.0 }.coefficients(SR);
        for v in [c.b0, c.b1, c.b2, c.a1, c.a2] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_enabled_if() {
        let d = FilterDesign::Highpass { freq: 100.0, q: 0.7 };
        assert_eq!(d.enabled_if(false), FilterDesign::Identity);
        assert_eq!(d.enabled_if(true), d);
    }
}
