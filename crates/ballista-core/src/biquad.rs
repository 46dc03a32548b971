//! Biquad (bi-quadratic) filter sections.
//!
//! Coefficients come from the RBJ Audio EQ Cookbook. They are designed in
//! double precision from frequency and sample rate, then stored as `f32`;
//! the per-sample state stays single precision.
//!
//! Coefficients and state are separate types so a stereo (or multi-band)
//! filter can share one coefficient set across several states.

use core::f64::consts::PI;
use libm::{cos, pow, sin};

/// Normalised biquad coefficients (`a0 == 1`).
///
/// Implements the Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficients.
    pub b0: f32,
    /// x[n-1] gain.
    pub b1: f32,
    /// x[n-2] gain.
    pub b2: f32,
    /// Feedback coefficients.
    pub a1: f32,
    /// y[n-2] gain.
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough: `b0 = 1`, everything else zero.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Normalise raw cookbook coefficients by `a0`.
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: (b0 * a0_inv) as f32,
            b1: (b1 * a0_inv) as f32,
            b2: (b2 * a0_inv) as f32,
            a1: (a1 * a0_inv) as f32,
            a2: (a2 * a0_inv) as f32,
        }
    }

    /// Second-order lowpass.
    pub fn lowpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_w, alpha) = omega(frequency, q, sample_rate);
        Self::from_raw(
            (1.0 - cos_w) / 2.0,
            1.0 - cos_w,
            (1.0 - cos_w) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w,
            1.0 - alpha,
        )
    }

    /// Second-order highpass.
    pub fn highpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_w, alpha) = omega(frequency, q, sample_rate);
        Self::from_raw(
            (1.0 + cos_w) / 2.0,
            -(1.0 + cos_w),
            (1.0 + cos_w) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w,
            1.0 - alpha,
        )
    }

    /// Second-order allpass (unity magnitude, phase turns through 180° at `frequency`).
    pub fn allpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_w, alpha) = omega(frequency, q, sample_rate);
        Self::from_raw(
            1.0 - alpha,
            -2.0 * cos_w,
            1.0 + alpha,
            1.0 + alpha,
            -2.0 * cos_w,
            1.0 - alpha,
        )
    }

    /// Peaking EQ: boost or cut around `frequency`.
    pub fn peak(frequency: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = pow(10.0, gain_db / 40.0);
        let (cos_w, alpha) = omega(frequency, q, sample_rate);
        Self::from_raw(
            1.0 + alpha * a,
            -2.0 * cos_w,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_w,
            1.0 - alpha / a,
        )
    }

    /// Low shelf with Q-controlled transition.
    pub fn low_shelf(frequency: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = pow(10.0, gain_db / 40.0);
        let (cos_w, alpha) = omega(frequency, q, sample_rate);
        let two_sqrt_a_alpha = 2.0 * libm::sqrt(a) * alpha;
        Self::from_raw(
            a * ((a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w),
            a * ((a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha),
            (a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha,
            -2.0 * ((a - 1.0) + (a + 1.0) * cos_w),
            (a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha,
        )
    }

    /// High shelf with Q-controlled transition.
    pub fn high_shelf(frequency: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = pow(10.0, gain_db / 40.0);
        let (cos_w, alpha) = omega(frequency, q, sample_rate);
        let two_sqrt_a_alpha = 2.0 * libm::sqrt(a) * alpha;
        Self::from_raw(
            a * ((a + 1.0) + (a - 1.0) * cos_w + two_sqrt_a_alpha),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w),
            a * ((a + 1.0) + (a - 1.0) * cos_w - two_sqrt_a_alpha),
            (a + 1.0) - (a - 1.0) * cos_w + two_sqrt_a_alpha,
            2.0 * ((a - 1.0) - (a + 1.0) * cos_w),
            (a + 1.0) - (a - 1.0) * cos_w - two_sqrt_a_alpha,
        )
    }

    /// Magnitude response at `frequency` (for tests and displays).
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * frequency / sample_rate;
        let (c1, s1) = (cos(w), sin(w));
        let (c2, s2) = (cos(2.0 * w), sin(2.0 * w));
        let (b0, b1, b2) = (f64::from(self.b0), f64::from(self.b1), f64::from(self.b2));
        let (a1, a2) = (f64::from(self.a1), f64::from(self.a2));

        let num_re = b0 + b1 * c1 + b2 * c2;
        let num_im = -(b1 * s1 + b2 * s2);
        let den_re = 1.0 + a1 * c1 + a2 * c2;
        let den_im = -(a1 * s1 + a2 * s2);
        libm::sqrt((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im))
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `(cos ω, α)` for the cookbook formulas.
#[inline]
fn omega(frequency: f64, q: f64, sample_rate: f64) -> (f64, f64) {
    let w = 2.0 * PI * frequency / sample_rate;
    (cos(w), sin(w) / (2.0 * q))
}

/// Direct Form I delay elements for one channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadState {
    /// Zeroed state.
    pub const fn new() -> Self {
        Self {
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, c: &BiquadCoefficients, input: f32) -> f32 {
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::math::flush_denormal(output);

        output
    }

    /// Clear the delay elements.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// A mono biquad: one coefficient set with its own state.
///
/// # Example
///
/// ```rust
/// use ballista_core::{Biquad, BiquadCoefficients};
///
/// let mut lp = Biquad::new();
/// lp.set_coefficients(BiquadCoefficients::lowpass(1000.0, 0.707, 48000.0));
/// let y = lp.process(1.0);
/// assert!(y > 0.0 && y < 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    state: BiquadState,
}

impl Biquad {
    /// A passthrough biquad.
    pub const fn new() -> Self {
        Self {
            coefficients: BiquadCoefficients::IDENTITY,
            state: BiquadState::new(),
        }
    }

    /// Replace the coefficients, keeping the state.
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) {
        self.coefficients = coefficients;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state.process(&self.coefficients, input)
    }

    /// Clear the state.
    pub fn clear(&mut self) {
        self.state.clear();
    }
}
