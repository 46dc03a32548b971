//! Static gain computers.
//!
//! Each curve maps a detected level in dB to a gain. Reductions are reported
//! in dB and are always `<= 0`; makeup, auto-gain and ceiling compensation are
//! applied on top, only where the curve says so.
//!
//! | Curve | Level source | Reduction |
//! |-------|--------------|-----------|
//! | [`CompressorCurve`] | envelope | `min(0, (1 - 1/ratio) * (threshold - level))` |
//! | [`GateCurve`] | rectified input | `(level - threshold) * (ratio - 1)` below threshold |
//! | [`LimiterCurve`] | instant-attack envelope | `min(0, threshold - level)` |
//! | [`ClipperCurve`] | the sample itself | dB overshoot of the clip point |

use crate::math::{MIN_LEVEL_DB, db_to_linear, linear_to_db};

/// Downward compressor curve with optional soft knee.
///
/// With `knee_db == 0` this is the hard-knee curve used by the compressor,
/// the de-esser and every multiband band.
///
/// # Example
///
/// ```rust
/// use ballista_core::CompressorCurve;
///
/// let curve = CompressorCurve::new(-10.0, 4.0, 0.0, 0.0);
/// assert!((curve.reduction_db(0.0) + 7.5).abs() < 1e-6);
/// assert_eq!(curve.reduction_db(-20.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorCurve {
    threshold_db: f32,
    slope: f32,
    knee_db: f32,
    makeup_db: f32,
}

impl CompressorCurve {
    /// Build a curve. Ratios below 1 are treated as 1 (no compression).
    pub fn new(threshold_db: f32, ratio: f32, knee_db: f32, makeup_db: f32) -> Self {
        let ratio = if ratio.is_finite() { ratio.max(1.0) } else { 1.0 };
        Self {
            threshold_db,
            slope: 1.0 - 1.0 / ratio,
            knee_db: knee_db.max(0.0),
            makeup_db,
        }
    }

    /// `1 - 1/ratio`.
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// Gain reduction in dB (`<= 0`) for a level in dB.
    #[inline]
    pub fn reduction_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        let half_knee = 0.5 * self.knee_db;
        if self.knee_db > 0.0 && over.abs() <= half_knee {
            let x = over + half_knee;
            return -self.slope * x * x / (2.0 * self.knee_db);
        }
        (self.slope * (self.threshold_db - level_db)).min(0.0)
    }

    /// Linear gain including makeup.
    #[inline]
    pub fn gain(&self, level_db: f32) -> f32 {
        db_to_linear(self.reduction_db(level_db) + self.makeup_db)
    }
}

/// Downward expander / gate target curve.
///
/// Above threshold the target is 1.0. Below it the target falls
/// `ratio - 1` dB per dB, so a large ratio approaches a hard gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateCurve {
    threshold_db: f32,
    ratio: f32,
}

impl GateCurve {
    /// Build a curve. Ratios below 1 are treated as 1 (gate open).
    pub fn new(threshold_db: f32, ratio: f32) -> Self {
        Self {
            threshold_db,
            ratio: if ratio.is_finite() { ratio.max(1.0) } else { 1.0 },
        }
    }

    /// Target gain (0 to 1) for a level in dB.
    #[inline]
    pub fn target(&self, level_db: f32) -> f32 {
        if level_db >= self.threshold_db {
            return 1.0;
        }
        let reduction = (level_db - self.threshold_db) * (self.ratio - 1.0);
        db_to_linear(reduction.max(2.0 * MIN_LEVEL_DB))
    }
}

/// Brickwall limiter curve with ceiling compensation.
///
/// Driven by an instant-attack envelope (which never sits below the
/// rectified input), `|x| * gain(env)` never exceeds the ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterCurve {
    threshold_db: f32,
    ceiling_db: f32,
}

impl LimiterCurve {
    /// Build a curve.
    pub fn new(threshold_db: f32, ceiling_db: f32) -> Self {
        Self {
            threshold_db,
            ceiling_db,
        }
    }

    /// Gain reduction in dB (`<= 0`).
    #[inline]
    pub fn reduction_db(&self, level_db: f32) -> f32 {
        (self.threshold_db - level_db).min(0.0)
    }

    /// Linear gain: reduction plus auto-gain (`-threshold`) plus ceiling.
    #[inline]
    pub fn gain(&self, level_db: f32) -> f32 {
        db_to_linear(self.reduction_db(level_db) - self.threshold_db + self.ceiling_db)
    }

    /// The ceiling as a linear amplitude.
    pub fn ceiling(&self) -> f32 {
        db_to_linear(self.ceiling_db)
    }
}

/// Per-sample hard clipper with auto-gain and ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipperCurve {
    threshold_db: f32,
    clip_level: f32,
    output_gain: f32,
}

impl ClipperCurve {
    /// Build a curve. With `auto_gain`, the clip point is raised back to
    /// 0 dBFS before the ceiling is applied.
    pub fn new(threshold_db: f32, ceiling_db: f32, auto_gain: bool) -> Self {
        let makeup_db = if auto_gain { -threshold_db } else { 0.0 };
        Self {
            threshold_db,
            clip_level: db_to_linear(threshold_db),
            output_gain: db_to_linear(makeup_db) * db_to_linear(ceiling_db),
        }
    }

    /// Clip point as a linear amplitude.
    pub fn clip_level(&self) -> f32 {
        self.clip_level
    }

    /// Process one sample. Returns the output and the reduction in dB (`<= 0`).
    #[inline]
    pub fn process(&self, x: f32) -> (f32, f32) {
        let mag = x.abs();
        let reduction = if mag > self.clip_level {
            (self.threshold_db - linear_to_db(mag)).min(0.0)
        } else {
            0.0
        };
        let clipped = x.clamp(-self.clip_level, self.clip_level);
        (clipped * self.output_gain, reduction)
    }
}
