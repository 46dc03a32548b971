//! Static waveshapers for saturation and clipping.
//!
//! | Shape | Character |
//! |-------|-----------|
//! | [`WaveShape::Atan`] | Smooth, gentle knee |
//! | [`WaveShape::Tanh`] | Smooth, firmer ceiling |
//! | [`WaveShape::Hard`] | Flat-top clipping |
//! | [`WaveShape::Foldback`] | Folds peaks back towards zero |
//!
//! With auto-gain on, every shape maps an input of 1.0 at the given drive to
//! (about) 1.0, so raising drive changes tone more than level.

use libm::{atanf, fmodf, tanhf};

/// Drives below this are treated as a bypass.
pub const MIN_DRIVE: f32 = 1e-3;

/// Waveshaper transfer curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveShape {
    /// Arctangent.
    #[default]
    Atan,
    /// Hyperbolic tangent.
    Tanh,
    /// Hard clip at ±1.
    Hard,
    /// Triangle fold at ±1.
    Foldback,
}

impl WaveShape {
    /// Choice labels, in index order.
    pub const NAMES: &'static [&'static str] = &["atan", "tanh", "hard", "foldback"];

    /// Map a choice index. Out-of-range indices pick the last shape.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Atan,
            1 => Self::Tanh,
            2 => Self::Hard,
            _ => Self::Foldback,
        }
    }

    #[inline]
    fn curve(self, x: f32) -> f32 {
        match self {
            Self::Atan => atanf(x),
            Self::Tanh => tanhf(x),
            Self::Hard => hard_clip(x, 1.0),
            Self::Foldback => foldback(x, 1.0),
        }
    }

    /// Gain that brings a unit input at `drive` back to unity.
    #[inline]
    pub fn auto_gain(self, drive: f32) -> f32 {
        let reference = match self {
            Self::Foldback => 1.0,
            _ => self.curve(drive),
        };
        if reference > MIN_DRIVE { 1.0 / reference } else { 1.0 }
    }

    /// Shape one sample at `drive`, optionally auto-gain compensated.
    ///
    /// A drive at or below [`MIN_DRIVE`] returns the input unchanged.
    #[inline]
    pub fn shape(self, x: f32, drive: f32, auto_gain: bool) -> f32 {
        if drive <= MIN_DRIVE {
            return x;
        }
        let y = self.curve(drive * x);
        if auto_gain { y * self.auto_gain(drive) } else { y }
    }
}

/// Clip to `±threshold`.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Fold `x` back into `±threshold` as a triangle wave.
///
/// Bounded for any finite input; NaN maps to 0.
#[inline]
pub fn foldback(x: f32, threshold: f32) -> f32 {
    if x.abs() <= threshold {
        return x;
    }
    if !x.is_finite() || threshold <= 0.0 {
        return 0.0;
    }
    let u = x / threshold;
    let mut m = fmodf(u + 1.0, 4.0);
    if m < 0.0 {
        m += 4.0;
    }
    threshold * (1.0 - (m - 2.0).abs())
}
